use std::io::{self, Write};

use crate::protocols::grey::Universe;

/// Render one frame's universes as a single command line, without the
/// trailing line break.
pub fn format_line(universes: &[Universe]) -> String {
    universes
        .iter()
        .map(format_universe)
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_universe(universe: &Universe) -> String {
    let values = universe
        .data
        .iter()
        .map(|b| b.to_string())
        .collect::<Vec<_>>()
        .join(",");
    format!("{} {}", universe.number, values)
}

/// Write one frame's command line and flush it through to the consumer.
pub fn write_line<W: Write>(output: &mut W, universes: &[Universe]) -> io::Result<()> {
    writeln!(output, "{}", format_line(universes))?;
    output.flush()
}

#[cfg(test)]
mod tests {
    use super::{format_line, write_line};
    use crate::protocols::grey::Universe;

    fn universe(number: u16, data: &[u8]) -> Universe {
        Universe {
            number,
            data: data.to_vec(),
        }
    }

    #[test]
    fn formats_two_universes() {
        let line = format_line(&[universe(1, &[10, 11, 12]), universe(2, &[20, 21, 22])]);
        assert_eq!(line, "1 10,11,12 2 20,21,22");
    }

    #[test]
    fn formats_full_byte_range_in_decimal() {
        let line = format_line(&[universe(512, &[0, 255, 7])]);
        assert_eq!(line, "512 0,255,7");
    }

    #[test]
    fn single_universe_has_no_joiner() {
        let line = format_line(&[universe(1, &[0])]);
        assert_eq!(line, "1 0");
    }

    #[test]
    fn write_line_terminates_with_one_line_break() {
        let mut out = Vec::new();
        write_line(&mut out, &[universe(1, &[10, 11, 12])]).unwrap();
        assert_eq!(out, b"1 10,11,12\n");
    }
}
