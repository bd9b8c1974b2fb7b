// WHOIS Client - Output Rendering
// Copyright (C) 2025 Akaere Networks
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::core::encoding::Codepage;
use crate::core::select::Hop;

/// One `[server]` header per hop followed by its text
pub fn render_text(hops: &[Hop]) -> String {
    let mut output = String::new();

    for hop in hops {
        output.push_str(&format!("[{}]\n", hop.server));
        output.push_str(&hop.text);
        if !hop.text.ends_with('\n') {
            output.push('\n');
        }
    }

    output
}

/// Rendered hops in the terminal's output codepage
pub fn render(hops: &[Hop], output: Codepage) -> Vec<u8> {
    output.encode(&render_text(hops))
}
