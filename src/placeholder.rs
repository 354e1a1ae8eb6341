//! Printf-style placeholder substitution.
//!
//! Recognizes `%`-tokens in translation texts: an optional positional index
//! (`%1$s`), optional length modifiers (`l`/`ll`), and a single type
//! character (any ASCII letter, plus `@`). `%%` escapes a literal percent.
//! Every recognized token is replaced by the matching argument's text
//! regardless of its verb; arity is not validated, so tokens without an
//! argument stay verbatim and spare arguments are dropped.

/// Substitutes `args` into the recognized placeholders of `template`.
///
/// Tokens without a positional index consume arguments left to right;
/// `%N$`-indexed tokens address arguments 1-based without moving that cursor.
pub fn substitute(template: &str, args: &[String]) -> String {
    let bytes = template.as_bytes();
    let mut out = String::with_capacity(template.len());
    let mut next = 0usize;
    let mut copied = 0usize;
    let mut i = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }

        // Escaped percent.
        if i + 1 < bytes.len() && bytes[i + 1] == b'%' {
            out.push_str(&template[copied..i]);
            out.push('%');
            i += 2;
            copied = i;
            continue;
        }

        let mut j = i + 1;

        // Optional positional index: digits followed by '$'.
        let mut index: Option<usize> = None;
        let start_digits = j;
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j < bytes.len() && j > start_digits && bytes[j] == b'$' {
            index = std::str::from_utf8(&bytes[start_digits..j])
                .ok()
                .and_then(|s| s.parse::<usize>().ok());
            j += 1;
        } else {
            j = i + 1;
        }

        // Optional length modifiers (l/ll).
        if j < bytes.len() && bytes[j] == b'l' {
            j += 1;
            if j < bytes.len() && bytes[j] == b'l' {
                j += 1;
            }
        }

        let recognized = j < bytes.len() && {
            let ch = bytes[j] as char;
            ch.is_ascii_alphabetic() || ch == '@'
        };
        if !recognized {
            i += 1;
            continue;
        }

        let arg = match index {
            Some(n) => n.checked_sub(1).and_then(|k| args.get(k)),
            None => {
                let arg = args.get(next);
                if arg.is_some() {
                    next += 1;
                }
                arg
            }
        };
        match arg {
            Some(text) => {
                out.push_str(&template[copied..i]);
                out.push_str(text);
                i = j + 1;
                copied = i;
            }
            // Token without an argument stays verbatim.
            None => i = j + 1,
        }
    }

    out.push_str(&template[copied..]);
    out
}
