//! Shell-style glob matching (fnmatch semantics, case-sensitive).
//!
//! - `*`       any run of characters, `/` included
//! - `?`       exactly one character
//! - `[abc]`, `[a-z]`, `[!abc]`  character classes; an unterminated `[` is literal

pub fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();

    let (mut pi, mut ti) = (0usize, 0usize);
    // последняя `*`: (позиция в pattern, позиция в text)
    let mut star: Option<(usize, usize)> = None;

    while ti < t.len() {
        if pi < p.len() {
            match p[pi] {
                '*' => {
                    star = Some((pi, ti));
                    pi += 1;
                    continue;
                }
                '?' => {
                    pi += 1;
                    ti += 1;
                    continue;
                }
                '[' => {
                    if let Some((hit, next)) = match_class(&p, pi, t[ti]) {
                        if hit {
                            pi = next;
                            ti += 1;
                            continue;
                        }
                    } else if t[ti] == '[' {
                        pi += 1;
                        ti += 1;
                        continue;
                    }
                }
                c => {
                    if c == t[ti] {
                        pi += 1;
                        ti += 1;
                        continue;
                    }
                }
            }
        }
        match star {
            Some((sp, st)) => {
                pi = sp + 1;
                ti = st + 1;
                star = Some((sp, st + 1));
            }
            None => return false,
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

/// Match `c` against the class starting at `p[start] == '['`.
/// Returns (matched, index after `]`), or None if the class is unterminated.
fn match_class(p: &[char], start: usize, c: char) -> Option<(bool, usize)> {
    let mut i = start + 1;
    let negate = i < p.len() && p[i] == '!';
    if negate {
        i += 1;
    }
    let mut hit = false;
    let mut first = true;
    while i < p.len() {
        // `]` first in the class is a literal
        if p[i] == ']' && !first {
            return Some((hit != negate, i + 1));
        }
        first = false;
        if i + 2 < p.len() && p[i + 1] == '-' && p[i + 2] != ']' {
            if p[i] <= c && c <= p[i + 2] {
                hit = true;
            }
            i += 3;
        } else {
            if p[i] == c {
                hit = true;
            }
            i += 1;
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_and_question() {
        assert!(glob_match("*", "foo"));
        assert!(glob_match("*", ""));
        assert!(glob_match("*.py", "main.py"));
        assert!(!glob_match("*.py", "main.rs"));
        assert!(glob_match("ma?n.py", "main.py"));
        assert!(!glob_match("ma?n.py", "maiin.py"));
        assert!(glob_match("test_*_x.py", "test_a_b_x.py"));
    }

    #[test]
    fn star_crosses_slashes() {
        assert!(glob_match("*.py", "pkg/sub/mod.py"));
        assert!(glob_match("pkg/*", "pkg/a/b.txt"));
    }

    #[test]
    fn classes() {
        assert!(glob_match("[abc].py", "b.py"));
        assert!(!glob_match("[!abc].py", "b.py"));
        assert!(glob_match("[!abc].py", "z.py"));
        assert!(glob_match("v[0-9].txt", "v7.txt"));
        assert!(!glob_match("v[0-9].txt", "vx.txt"));
        assert!(glob_match("[]]", "]"));
    }

    #[test]
    fn unterminated_bracket_is_literal() {
        assert!(glob_match("a[b", "a[b"));
        assert!(!glob_match("a[b", "ab"));
    }

    #[test]
    fn exact() {
        assert!(glob_match("secrets.py", "secrets.py"));
        assert!(!glob_match("secrets.py", "secrets.pyc"));
    }
}
