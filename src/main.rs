use std::process::ExitCode;

use log::{debug, info};

use sim6502::{Core, CpuState, FlatMemory};

/// Upper bound on executed instructions when none is given on the command
/// line, so a looping image cannot hang the host.
const DEFAULT_MAX_STEPS: u64 = 1_000_000;

/// Minimal host: a flat 64 KiB memory, a raw machine-code image and a
/// step loop that runs until the core reports a fatal error or the
/// instruction cap is reached. `RUST_LOG` selects how chatty the run is.
fn main() -> ExitCode {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        eprintln!("usage: sim6502 <image> [load-address] [max-steps]");
        return ExitCode::FAILURE;
    };

    let origin = match args.next() {
        Some(arg) => match parse_addr(&arg) {
            Some(addr) => addr,
            None => {
                eprintln!("bad load address: {arg}");
                return ExitCode::FAILURE;
            }
        },
        None => 0x8000,
    };

    let max_steps = match args.next() {
        Some(arg) => match arg.parse() {
            Ok(n) => n,
            Err(_) => {
                eprintln!("bad step count: {arg}");
                return ExitCode::FAILURE;
            }
        },
        None => DEFAULT_MAX_STEPS,
    };

    let image = match std::fs::read(&path) {
        Ok(image) => image,
        Err(err) => {
            eprintln!("cannot read {path}: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut mem = FlatMemory::new();
    mem.load(origin, &image);

    let mut core = Core::new(mem);
    let mut cpu = CpuState::new();
    let mut cycles: u64 = 0;

    core.rst(&mut cpu, &mut cycles);
    if cpu.pc == 0x0000 {
        // The image carries no reset vector; start at the load address.
        cpu.pc = origin;
    }

    info!("loaded {} bytes at {:#06x}, entry {:#06x}", image.len(), origin, cpu.pc);

    for _ in 0..max_steps {
        if let Err(err) = core.step(&mut cpu, &mut cycles) {
            eprintln!("halted after {cycles} cycles: {err}");
            eprintln!("{cpu}");
            return ExitCode::FAILURE;
        }

        debug!("{} cycles:{}", cpu, cycles);
    }

    info!("step limit of {max_steps} reached after {cycles} cycles");
    ExitCode::SUCCESS
}

fn parse_addr(arg: &str) -> Option<u16> {
    if let Some(hex) = arg.strip_prefix("0x") {
        u16::from_str_radix(hex, 16).ok()
    } else {
        arg.parse().ok()
    }
}
