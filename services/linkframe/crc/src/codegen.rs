//! Rendering of lookup tables as Rust source.
//!
//! Used to bake a profile into a crate as plain constants, without building
//! the table at startup.

use crate::table::{CrcTable, TABLE_LEN};
use crate::CrcProfile;

const VALUES_PER_LINE: usize = 8;

/// Format `value` as zero-padded hex wide enough for `bits` bits.
pub fn hex_fmt(value: u32, bits: u32) -> String {
    let digits = (bits.max(1) as usize - 1) / 4 + 1;
    format!("{:#0width$x}", value, width = digits + 2)
}

/// Smallest unsigned integer type holding `bits` bits.
pub fn data_type(bits: u32) -> &'static str {
    match (bits.max(1) - 1) / 8 + 1 {
        1 => "u8",
        2 => "u16",
        _ => "u32",
    }
}

/// Table values, eight per line, each line ending in a comma.
pub fn table_str(table: &CrcTable, bits: u32) -> String {
    table
        .chunks(VALUES_PER_LINE)
        .map(|line| {
            let values: Vec<String> = line.iter().map(|&v| hex_fmt(v, bits)).collect();
            format!("{},", values.join(", "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Turn an arbitrary name (`"CRC-16/KERMIT"`) into a constant identifier (`CRC_16_KERMIT`).
pub fn const_ident(name: &str) -> String {
    let mut ident = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            ident.push(c.to_ascii_uppercase());
        } else if !ident.is_empty() && !ident.ends_with('_') {
            ident.push('_');
        }
    }

    while ident.ends_with('_') {
        ident.pop();
    }

    if ident.is_empty() {
        return "CRC".to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert_str(0, "CRC_");
    }
    ident
}

/// Rust source defining `profile` as `NAME_TABLE`, `NAME_INITIAL`,
/// `NAME_FINAL_XOR`, and `NAME_LSB_FIRST` constants.
pub fn render_rust(name: &str, profile: &CrcProfile) -> String {
    let ident = const_ident(name);
    let bits = profile.width();
    let ty = data_type(bits);

    let table: String = table_str(profile.table(), bits)
        .lines()
        .map(|line| format!("    {}\n", line))
        .collect();

    format!(
        "// {name}: generated lookup table, do not edit.\n\
         \n\
         pub const {ident}_TABLE: [{ty}; {len}] = [\n\
         {table}];\n\
         pub const {ident}_INITIAL: {ty} = {initial};\n\
         pub const {ident}_FINAL_XOR: {ty} = {final_xor};\n\
         pub const {ident}_LSB_FIRST: bool = {lsb_first};\n",
        name = name,
        ident = ident,
        ty = ty,
        len = TABLE_LEN,
        table = table,
        initial = hex_fmt(profile.initial(), bits),
        final_xor = hex_fmt(profile.final_xor(), bits),
        lsb_first = profile.lsb_first(),
    )
}
