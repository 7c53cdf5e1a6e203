use bytesize::ByteSize;

use crate::cli::SizeFormat;

pub mod report;

pub const NO_DATA: &str = "-";

/// Returns a formatter closure for the given `SizeFormat`.
///
/// A reading of zero means the host could not answer, so it renders as
/// [`NO_DATA`] rather than as an empty machine.
pub fn size_formatter(size_format: SizeFormat) -> impl Fn(Option<u64>) -> String {
    move |bytes: Option<u64>| match bytes {
        None | Some(0) => NO_DATA.into(),
        Some(n) => match size_format {
            SizeFormat::Human => ByteSize::b(n).to_string(),
            SizeFormat::Bytes => n.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_sizes_render_as_no_data() {
        let fmt = size_formatter(SizeFormat::Human);
        assert_eq!(fmt(None), NO_DATA);
        assert_eq!(fmt(Some(0)), NO_DATA);
    }

    #[test]
    fn bytes_are_printed_verbatim() {
        let fmt = size_formatter(SizeFormat::Bytes);
        assert_eq!(fmt(Some(17179869184)), "17179869184");
    }

    #[test]
    fn human_sizes_carry_a_unit() {
        let fmt = size_formatter(SizeFormat::Human);
        let s = fmt(Some(2 * 1024 * 1024 * 1024));
        assert!(s.ends_with('B'), "{}", s);
        assert_ne!(s, "2147483648");
    }
}
