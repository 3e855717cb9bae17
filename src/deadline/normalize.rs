/// Fold deadline text into the shape the lexer expects: ASCII digits and
/// punctuation, kanji numerals rewritten as digits, single ASCII spaces.
pub fn normalize(input: &str) -> String {
    let folded = input
        .split_whitespace()
        .map(|word| word.chars().map(fold_width).collect::<String>())
        .collect::<Vec<_>>()
        .join(" ");
    rewrite_kanji_numerals(&folded)
}

fn fold_width(c: char) -> char {
    match c {
        '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
        '：' => ':',
        '／' => '/',
        '－' | '−' => '-',
        '（' => '(',
        '）' => ')',
        '，' => ',',
        _ => c,
    }
}

fn kanji_digit(c: char) -> Option<u32> {
    match c {
        '〇' | '零' => Some(0),
        '一' => Some(1),
        '二' => Some(2),
        '三' => Some(3),
        '四' => Some(4),
        '五' => Some(5),
        '六' => Some(6),
        '七' => Some(7),
        '八' => Some(8),
        '九' => Some(9),
        _ => None,
    }
}

fn is_kanji_numeral(c: char) -> bool {
    c == '十' || kanji_digit(c).is_some()
}

fn rewrite_kanji_numerals(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut run = String::new();

    for c in s.chars() {
        if is_kanji_numeral(c) {
            run.push(c);
            continue;
        }
        flush_run(&mut run, &mut out);
        out.push(c);
    }
    flush_run(&mut run, &mut out);
    out
}

fn flush_run(run: &mut String, out: &mut String) {
    if run.is_empty() {
        return;
    }
    match kanji_value(run) {
        Some(n) => out.push_str(&n.to_string()),
        None => out.push_str(run),
    }
    run.clear();
}

/// "二十三" → 23, "十" → 10, "二〇二五" → 2025 (positional when no 十).
fn kanji_value(run: &str) -> Option<u64> {
    if !run.contains('十') {
        let mut n: u64 = 0;
        for c in run.chars() {
            n = n.checked_mul(10)?.checked_add(u64::from(kanji_digit(c)?))?;
        }
        return Some(n);
    }

    let (tens, ones) = run.split_once('十')?;
    let tens = match tens.chars().count() {
        0 => 1,
        1 => u64::from(kanji_digit(tens.chars().next()?)?),
        _ => return None,
    };
    let ones = match ones.chars().count() {
        0 => 0,
        1 => u64::from(kanji_digit(ones.chars().next()?)?),
        _ => return None,
    };
    Some(tens * 10 + ones)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn folds_full_width_digits_and_spaces() {
        assert_eq!(normalize(" １２月 ２５日　　１０：３０ "), "12月 25日 10:30");
    }

    #[test]
    fn rewrites_kanji_numerals() {
        assert_eq!(normalize("三日後の九時"), "3日後の9時");
        assert_eq!(normalize("二十日"), "20日");
        assert_eq!(normalize("十二時半"), "12時半");
        assert_eq!(normalize("十時"), "10時");
        assert_eq!(normalize("二〇二五年一月五日"), "2025年1月5日");
    }

    #[test]
    fn leaves_malformed_runs_alone() {
        assert_eq!(normalize("十十"), "十十");
    }
}
