use anyhow::{bail, Context, Result};
use lexopt::Parser;
use std::{env, ffi::OsString, fmt, process};

fn print_help() {
    println!(
        "{}",
        format!(
            r#"
{crate_name} {crate_version}
{crate_description}

USAGE:
    {bin} [OPTIONS] mem
    {bin} [OPTIONS] sym <LIBRARY> <SYMBOL>...

OPTIONS:
    -f, --format <FORMAT>    [possible values: standard, json]
        --json               Same as --format json
    -b, --bytes              Print sizes as plain byte counts
    -v, --verbose            Raise the log level (repeatable, RUST_LOG wins)
    -h, --help               Print help information
    -V, --version            Print version information

EXAMPLES:
    {bin} mem
    {bin} --json sym libc.so.6 abs strlen

    "#,
            bin = env!("CARGO_BIN_NAME"),
            crate_name = env!("CARGO_PKG_NAME"),
            crate_version = env!("CARGO_PKG_VERSION"),
            crate_description = env!("CARGO_PKG_DESCRIPTION"),
        )
        .trim(),
    );
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Standard,
    Json,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Standard
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Standard => write!(f, "standard"),
            Self::Json => write!(f, "json"),
        }
    }
}

impl From<String> for OutputFormat {
    fn from(value: String) -> Self {
        match value.as_str() {
            "standard" => Self::Standard,
            "json" => Self::Json,
            _ => {
                eprintln!(
                    "Unrecognised output format: '{}', defaulting to {}",
                    value,
                    Self::Standard
                );
                Self::Standard
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeFormat {
    Human,
    Bytes,
}

impl Default for SizeFormat {
    fn default() -> Self {
        Self::Human
    }
}

#[derive(Debug, PartialEq)]
pub enum Command {
    Mem,
    Sym { library: String, symbols: Vec<String> },
}

#[derive(Debug)]
pub struct Args {
    pub command: Command,
    pub output_format: OutputFormat,
    pub size_format: SizeFormat,
    pub verbosity: u8,
}

impl Args {
    pub fn parse() -> Result<Args> {
        Args::parse_from(env::args_os().skip(1))
    }

    pub fn parse_from<I>(args: I) -> Result<Args>
    where
        I: IntoIterator,
        I::Item: Into<OsString>,
    {
        use lexopt::prelude::*;

        let mut output_format = OutputFormat::default();
        let mut size_format = SizeFormat::default();
        let mut verbosity = 0u8;
        let mut positional = vec![];

        let mut parser = Parser::from_args(args);
        while let Some(arg) = parser.next()? {
            match arg {
                Short('f') | Long("format") => {
                    output_format = parser.value()?.string()?.into();
                }
                Long("json") => output_format = OutputFormat::Json,
                Short('b') | Long("bytes") => size_format = SizeFormat::Bytes,
                Short('v') | Long("verbose") => verbosity = verbosity.saturating_add(1),
                Short('h') | Long("help") => {
                    print_help();
                    process::exit(0);
                }
                Short('V') | Long("version") => {
                    println!(
                        "{crate_name} {crate_version}",
                        crate_name = env!("CARGO_PKG_NAME"),
                        crate_version = env!("CARGO_PKG_VERSION")
                    );
                    process::exit(0);
                }
                Value(val) => positional.push(val.string()?),
                _ => return Err(arg.unexpected().into()),
            }
        }

        let mut positional = positional.into_iter();
        let command = match positional.next().as_deref() {
            Some("mem") => Command::Mem,
            Some("sym") => {
                let library = positional.next().context("sym needs a library")?;
                let symbols: Vec<String> = positional.by_ref().collect();
                if symbols.is_empty() {
                    bail!("sym needs at least one symbol name");
                }
                Command::Sym { library, symbols }
            }
            Some(other) => bail!("unknown command '{}'", other),
            None => bail!("no command given"),
        };

        if positional.next().is_some() {
            bail!("unexpected extra arguments");
        }

        Ok(Args {
            command,
            output_format,
            size_format,
            verbosity,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_with_defaults() {
        let args = Args::parse_from(vec!["mem"]).unwrap();
        assert_eq!(args.command, Command::Mem);
        assert_eq!(args.output_format, OutputFormat::Standard);
        assert_eq!(args.size_format, SizeFormat::Human);
        assert_eq!(args.verbosity, 0);
    }

    #[test]
    fn options_before_command() {
        let args = Args::parse_from(vec!["-vv", "--format", "json", "-b", "mem"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Json);
        assert_eq!(args.size_format, SizeFormat::Bytes);
        assert_eq!(args.verbosity, 2);
    }

    #[test]
    fn sym_collects_symbols() {
        let args = Args::parse_from(vec!["sym", "libc.so.6", "abs", "strlen", "--json"]).unwrap();
        assert_eq!(
            args.command,
            Command::Sym {
                library: "libc.so.6".into(),
                symbols: vec!["abs".into(), "strlen".into()],
            }
        );
        assert_eq!(args.output_format, OutputFormat::Json);
    }

    #[test]
    fn sym_without_symbols_is_an_error() {
        assert!(Args::parse_from(vec!["sym", "libc.so.6"]).is_err());
        assert!(Args::parse_from(vec!["sym"]).is_err());
    }

    #[test]
    fn unknown_input_is_an_error() {
        assert!(Args::parse_from(Vec::<String>::new()).is_err());
        assert!(Args::parse_from(vec!["swap"]).is_err());
        assert!(Args::parse_from(vec!["mem", "extra"]).is_err());
        assert!(Args::parse_from(vec!["--frobnicate", "mem"]).is_err());
    }

    #[test]
    fn unknown_format_falls_back_to_standard() {
        let args = Args::parse_from(vec!["--format", "yaml", "mem"]).unwrap();
        assert_eq!(args.output_format, OutputFormat::Standard);
    }
}
