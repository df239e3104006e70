use super::error::{SignatureError, SignatureFault};

const OPENERS: [char; 4] = ['(', '[', '{', '<'];
const CLOSERS: [char; 4] = [')', ']', '}', '>'];

/// Splits a parameter list into its top-level arguments.
///
/// Commas only separate arguments at nesting depth zero. All four bracket
/// kinds share one depth counter, so `<` and `>` always count as brackets.
/// Pieces are trimmed; blank input yields no pieces. Errors carry the
/// trimmed text from the start of the offending piece.
pub fn split_arguments(args: &str) -> Result<Vec<String>, SignatureError> {
    if args.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;

    for (idx, ch) in args.char_indices() {
        if OPENERS.contains(&ch) {
            depth += 1;
        } else if CLOSERS.contains(&ch) {
            depth = depth.checked_sub(1).ok_or_else(|| {
                SignatureError::malformed(SignatureFault::ExcessCloser, args[start..].trim())
            })?;
        } else if ch == ',' && depth == 0 {
            pieces.push(args[start..idx].trim().to_string());
            start = idx + ch.len_utf8();
        }
    }

    if depth > 0 {
        return Err(SignatureError::malformed(
            SignatureFault::UnclosedOpener,
            args[start..].trim(),
        ));
    }

    pieces.push(args[start..].trim().to_string());
    Ok(pieces)
}

#[cfg(test)]
mod tests {
    use super::split_arguments;
    use crate::scanner::error::{SignatureError, SignatureFault};

    fn split(args: &str) -> Vec<String> {
        split_arguments(args).expect("balanced arguments")
    }

    #[test]
    fn blank_input_has_no_arguments() {
        assert!(split("").is_empty());
        assert!(split("   ").is_empty());
    }

    #[test]
    fn splits_only_top_level_commas() {
        assert_eq!(
            split("const Vector3 &position, const Color &color = Color(1, 0, 0), real_t duration = 0"),
            [
                "const Vector3 &position",
                "const Color &color = Color(1, 0, 0)",
                "real_t duration = 0",
            ]
        );
    }

    #[test]
    fn every_bracket_kind_nests() {
        assert_eq!(
            split("std::map<int, float> m, int a[2] = {1, 2}, Callable c = f([x, y])"),
            [
                "std::map<int, float> m",
                "int a[2] = {1, 2}",
                "Callable c = f([x, y])",
            ]
        );
    }

    #[test]
    fn rejoined_pieces_reproduce_the_tokens() {
        let input = "Ref<A> a,  PackedVector3Array points = PackedVector3Array(), B<C<D>> *e";
        let rejoined = split(input).join(",");
        let squash = |s: &str| s.split_whitespace().collect::<String>();
        assert_eq!(squash(&rejoined), squash(input));
    }

    #[test]
    fn mixed_brackets_nest_inside_each_other() {
        assert_eq!(
            split("std::map<int, Vector<float>> m, Array a = Array({1, [2, 3]})"),
            ["std::map<int, Vector<float>> m", "Array a = Array({1, [2, 3]})"]
        );
    }

    #[test]
    fn trailing_comma_keeps_an_empty_piece() {
        assert_eq!(split("int a,"), ["int a", ""]);
    }

    #[test]
    fn whitespace_only_piece_is_empty() {
        assert_eq!(split("a,  , b"), ["a", "", "b"]);
    }

    #[test]
    fn closer_at_the_start_is_malformed() {
        assert_eq!(
            split_arguments(")a, b").unwrap_err(),
            SignatureError::malformed(SignatureFault::ExcessCloser, ")a, b")
        );
    }

    #[test]
    fn trailing_unclosed_angle_reports_its_piece() {
        assert_eq!(
            split_arguments("int a, Vector<int b").unwrap_err(),
            SignatureError::malformed(SignatureFault::UnclosedOpener, "Vector<int b")
        );
    }

    #[test]
    fn excess_closer_is_malformed() {
        let err = split_arguments("int a), int b").unwrap_err();
        assert!(matches!(
            err,
            SignatureError::MalformedSignature {
                fault: SignatureFault::ExcessCloser,
                ..
            }
        ));
    }

    #[test]
    fn unclosed_opener_is_malformed() {
        let err = split_arguments("Color c = Color(1, 2").unwrap_err();
        match err {
            SignatureError::MalformedSignature { fault, text } => {
                assert_eq!(fault, SignatureFault::UnclosedOpener);
                assert_eq!(text, "Color c = Color(1, 2");
            }
            other => panic!("expected malformed signature, got {other:?}"),
        }
    }
}
