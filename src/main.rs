mod cli;
mod fmt;

use anyhow::{Context, Result};
use flexi_logger::{Logger, LoggerHandle};

use cli::{Args, Command, OutputFormat, SizeFormat};
use fmt::report::{MemReport, SymReport, Symbol};
use hostshim::{dl, mem};

fn start_logger(verbosity: u8) -> Result<LoggerHandle> {
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let handle = Logger::try_with_env_or_str(level)?
        .format(flexi_logger::colored_default_format)
        .start()?;
    Ok(handle)
}

/// Zero is the facade's "unknown".
fn known(bytes: u64) -> Option<u64> {
    if bytes == 0 {
        None
    } else {
        Some(bytes)
    }
}

fn run_mem(output_format: OutputFormat, size_format: SizeFormat) -> MemReport {
    let mut report = MemReport::new(output_format, size_format);
    report.host = os_info::get().to_string();
    report.mem_total = known(mem::total_memory());
    report.mem_free = known(mem::free_memory());
    report.mem_avail = known(mem::available_memory());
    report
}

fn run_sym(output_format: OutputFormat, library: String, symbols: &[String]) -> Result<SymReport> {
    let handle = dl::try_load_library(&library)
        .with_context(|| format!("failed to load library '{}'", library))?;

    let mut report = SymReport::new(output_format, library);
    for name in symbols {
        let address = dl::get_address(handle, name);
        log::info!("{} -> {:?}", name, address);
        report.symbols.push(Symbol {
            name: name.clone(),
            address: address.map(|a| format!("{:p}", a)),
        });
    }
    report.unloaded = dl::unload_library(handle);

    Ok(report)
}

fn main() -> Result<()> {
    let args = Args::parse()?;
    let _logger = start_logger(args.verbosity)?;
    log::debug!("{:?}", args);

    match args.command {
        Command::Mem => print!("{}", run_mem(args.output_format, args.size_format)),
        Command::Sym { library, symbols } => {
            print!("{}", run_sym(args.output_format, library, &symbols)?)
        }
    }

    Ok(())
}
