use serde::Serialize;
use std::fmt::Display;

use crate::cli::{OutputFormat, SizeFormat};
use crate::fmt::{size_formatter, NO_DATA};

#[derive(Debug, Default, Serialize)]
pub struct MemReport {
    #[serde(skip)]
    output_format: OutputFormat,
    #[serde(skip)]
    size_format: SizeFormat,
    // info
    pub host: String,
    pub mem_total: Option<u64>,
    pub mem_free: Option<u64>,
    pub mem_avail: Option<u64>,
}

impl MemReport {
    pub fn new(output_format: OutputFormat, size_format: SizeFormat) -> MemReport {
        MemReport {
            output_format,
            size_format,
            ..MemReport::default()
        }
    }
}

impl Display for MemReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.output_format {
            OutputFormat::Json => {
                let json_string = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                writeln!(f, "{}", json_string)?;
            }
            OutputFormat::Standard => {
                let size = size_formatter(self.size_format);
                writeln!(f, "host:      {}", self.host)?;
                writeln!(f, "mem_total: {}", size(self.mem_total))?;
                writeln!(f, "mem_free:  {}", size(self.mem_free))?;
                writeln!(f, "mem_avail: {}", size(self.mem_avail))?;
            }
        }

        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct Symbol {
    pub name: String,
    pub address: Option<String>,
}

#[derive(Debug, Default, Serialize)]
pub struct SymReport {
    #[serde(skip)]
    output_format: OutputFormat,
    // info
    pub library: String,
    pub symbols: Vec<Symbol>,
    pub unloaded: bool,
}

impl SymReport {
    pub fn new(output_format: OutputFormat, library: String) -> SymReport {
        SymReport {
            output_format,
            library,
            ..SymReport::default()
        }
    }
}

impl Display for SymReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.output_format {
            OutputFormat::Json => {
                let json_string = serde_json::to_string(self).map_err(|_| std::fmt::Error)?;
                writeln!(f, "{}", json_string)?;
            }
            OutputFormat::Standard => {
                writeln!(f, "library:  {}", self.library)?;
                let width = self.symbols.iter().map(|s| s.name.len()).max().unwrap_or(0);
                for symbol in &self.symbols {
                    writeln!(
                        f,
                        "  {:width$}  {}",
                        symbol.name,
                        symbol.address.as_deref().unwrap_or(NO_DATA),
                        width = width
                    )?;
                }
                writeln!(f, "unloaded: {}", self.unloaded)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mem_report_json_keeps_raw_bytes() {
        let mut report = MemReport::new(OutputFormat::Json, SizeFormat::Human);
        report.host = "Linux 6.1.0 [64-bit]".into();
        report.mem_total = Some(8192);
        report.mem_free = None;
        report.mem_avail = Some(4096);

        let value: serde_json::Value = serde_json::from_str(&report.to_string()).unwrap();
        assert_eq!(value["mem_total"], 8192);
        assert!(value["mem_free"].is_null());
        assert_eq!(value["mem_avail"], 4096);
        assert!(value.get("output_format").is_none());
    }

    #[test]
    fn mem_report_standard_marks_unknowns() {
        let mut report = MemReport::new(OutputFormat::Standard, SizeFormat::Bytes);
        report.mem_total = Some(8192);
        let text = report.to_string();
        assert!(text.contains("mem_total: 8192"));
        assert!(text.contains("mem_free:  -"));
    }

    #[test]
    fn sym_report_lists_missing_symbols() {
        let mut report = SymReport::new(OutputFormat::Standard, "libc.so.6".into());
        report.symbols.push(Symbol {
            name: "abs".into(),
            address: Some("0x7f0000001000".into()),
        });
        report.symbols.push(Symbol {
            name: "nope".into(),
            address: None,
        });
        report.unloaded = true;

        let text = report.to_string();
        assert!(text.contains("  abs   0x7f0000001000"));
        assert!(text.contains("  nope  -"));
        assert!(text.ends_with("unloaded: true\n"));
    }
}
