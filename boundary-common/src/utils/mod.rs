/*
This code is part of the Boundary Tools geometry-processing library.
Authors: Boundary Tools Contributors
Created: 02/03/2026
Last Modified: 19/06/2026
License: MIT
*/

use std::time::Instant;

/// Returns a formatted string of elapsed time, e.g.
/// `1min 34.852s`
pub fn get_formatted_elapsed_time(instant: Instant) -> String {
    let dur = instant.elapsed();
    let minutes = dur.as_secs() / 60;
    let sub_sec = dur.as_secs() % 60;
    let sub_milli = dur.subsec_millis();
    if minutes > 0 {
        return format!("{}min {}.{:03}s", minutes, sub_sec, sub_milli);
    }
    format!("{}.{:03}s", sub_sec, sub_milli)
}

/// Wraps text at `width` columns. Paragraphs (separated by blank lines)
/// are kept apart; single newlines inside a paragraph are folded.
pub fn wrapped_text(val: &str, width: usize) -> String {
    let paragraphs: Vec<&str> = val.split("\n\n").collect();
    let mut ret = String::new();
    for (i, para) in paragraphs.iter().enumerate() {
        let s = para.replace('\n', " ");
        let mut line = String::new();
        for word in s.split_whitespace() {
            if line.is_empty() {
                line.push_str(word);
            } else if line.len() + word.len() + 1 <= width {
                line.push(' ');
                line.push_str(word);
            } else {
                ret.push_str(&line);
                ret.push('\n');
                line = word.to_string();
            }
        }
        ret.push_str(&line);
        if i < paragraphs.len() - 1 {
            ret.push_str("\n\n");
        }
    }
    ret
}

#[cfg(test)]
mod test {
    use super::wrapped_text;

    #[test]
    fn test_wrapped_text() {
        assert_eq!(wrapped_text("aaa bbb ccc", 7), "aaa bbb\nccc");
        assert_eq!(wrapped_text("one\ntwo\n\nthree", 80), "one two\n\nthree");
    }
}
