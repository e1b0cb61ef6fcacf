use clap::Parser;
use pack_core::{Pack, PackResult, PackType, Packer, Unpacker};
use serde::Serialize;

use crate::args::{Command, InspectArgs};

mod args;

/// A record packed through the serde bridge
#[derive(Serialize)]
struct Sample {
    id: u32,
    name: String,
    readings: Vec<i16>,
    note: Option<String>,
}

fn main() {
    let args = InspectArgs::parse();

    std::env::set_var("RUST_LOG", args.log_level.to_string());
    pretty_env_logger::init();

    let res = match args.command {
        Command::Demo { tagged } => demo(tagged),
        Command::Decode { hex } => decode(&hex),
    };

    if let Err(e) = res {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

/// Pack `value` raw or tagged and print the result
fn show<T: PackType>(label: &str, value: &T, tagged: bool) -> PackResult<()> {
    let mut packer = Packer::new();
    match tagged {
        true => packer.pack(value)?,
        false => packer.pack_value(value)?,
    };
    let pack = packer.into_pack();

    println!("{} ({}, {} byte(s))", label, T::type_info(), pack.len());
    println!("{}\n", pack.hex_dump());

    if tagged {
        let (_, value) = Unpacker::new(&pack).unpack_dynamic()?;
        log::info!("{} reads back as {}", label, value);
    }

    Ok(())
}

fn demo(tagged: bool) -> Result<(), String> {
    log::info!("packing samples, tagged: {}", tagged);

    let samples = || -> PackResult<()> {
        show("uint32", &5_u32, tagged)?;
        show("list", &vec![-1_i8, 1, -2, 2], tagged)?;
        show("string", &String::from("hello world"), tagged)?;
        show(
            "tuple",
            &(vec![-1_i8, -2], None::<bool>, String::from("hi"), 12_u32),
            tagged,
        )?;

        let sample = Sample {
            id: 7,
            name: String::from("sensor-a"),
            readings: vec![20, -4],
            note: None,
        };
        let pack: Pack = pack_core::to_pack(&sample)?;
        println!("serde record ({} byte(s))", pack.len());
        println!("{}\n", pack.hex_dump());

        Ok(())
    };

    samples().map_err(|e| e.to_string())
}

fn decode(hex: &str) -> Result<(), String> {
    let bytes = args::parse_hex(hex)?;
    log::info!("decoding {} byte(s)", bytes.len());

    let mut unpacker = Unpacker::new(&bytes);
    while !unpacker.is_empty() {
        let at = unpacker.position();
        let (shape, value) = unpacker
            .unpack_dynamic()
            .map_err(|e| format!("at offset {}: {}", at, e))?;

        println!("{:>6}  {}: {}", at, shape, value);
    }

    Ok(())
}
