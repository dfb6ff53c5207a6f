//! Source rendering of substitution tables.

use aes_core::SboxTable;

/// Renders `table` as a Rust `static` array named `name`, sixteen values per
/// row with a column header and a row index comment.
pub fn render_table(name: &str, table: &[u8; 256]) -> String {
    let header: Vec<String> = (0..16).map(|c| format!("{c:X}")).collect();
    let mut out = format!("static {name}: [u8; 256] = [\n");
    out.push_str(&format!("    // {}\n", header.join("     ")));
    for (row, chunk) in table.chunks(16).enumerate() {
        let values: Vec<String> = chunk.iter().map(|b| format!("0x{b:02x}")).collect();
        out.push_str(&format!("    {}, // {row:X}\n", values.join(", ")));
    }
    out.push_str("];\n");
    out
}

/// Renders the forward table as `name` and the inverse as `R{name}`,
/// separated by a blank line.
pub fn render_pair(name: &str, table: &SboxTable) -> String {
    let mut out = render_table(name, table.forward());
    out.push('\n');
    out.push_str(&render_table(&format!("R{name}"), table.inverse()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_core::SboxTable;

    #[test]
    fn renders_sixteen_rows_with_headers() {
        let text = render_table("SBOX", SboxTable::STANDARD.forward());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 19);
        assert_eq!(lines[0], "static SBOX: [u8; 256] = [");
        assert!(lines[1].starts_with("    // 0     1"));
        assert!(lines[2].starts_with("    0x63, 0x7c, 0x77, 0x7b,"));
        assert!(lines[2].ends_with("0x76, // 0"));
        assert!(lines[17].ends_with("0x16, // F"));
        assert_eq!(lines[18], "];");
    }

    #[test]
    fn rendered_values_parse_back() {
        let text = render_table("T", SboxTable::EXPERIMENTAL.forward());
        let values: Vec<u8> = text
            .lines()
            .skip(2)
            .take(16)
            .flat_map(|line| line.split("//").next().unwrap_or("").split(','))
            .filter_map(|v| v.trim().strip_prefix("0x"))
            .map(|v| u8::from_str_radix(v, 16).unwrap())
            .collect();
        assert_eq!(values.as_slice(), SboxTable::EXPERIMENTAL.forward());
    }

    #[test]
    fn pair_renders_forward_then_inverse() {
        let text = render_pair("SBOX", &SboxTable::STANDARD);
        let blocks: Vec<&str> = text.split("\n\n").collect();
        assert_eq!(blocks.len(), 2);
        assert_eq!(format!("{}\n", blocks[0]), render_table("SBOX", SboxTable::STANDARD.forward()));
        assert_eq!(blocks[1], render_table("RSBOX", SboxTable::STANDARD.inverse()));
        assert!(blocks[1].lines().nth(2).unwrap().starts_with("    0x52, 0x09, 0x6a, 0xd5,"));
    }
}
