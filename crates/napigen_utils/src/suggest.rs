/// Returns the candidate closest to `target` by edit distance, if any is close
/// enough to plausibly be a typo of it.
pub fn find_best_match(target: &str, candidates: impl Iterator<Item = String>) -> Option<String> {
    let mut best_candidate = None;
    let mut min_distance = usize::MAX;
    let threshold = if target.len() < 8 { 1 } else { 3 };

    for candidate in candidates {
        if candidate == target {
            continue;
        }
        let distance = levenshtein_distance(target, &candidate);
        if distance <= threshold && distance < min_distance {
            min_distance = distance;
            best_candidate = Some(candidate);
        }
    }

    best_candidate
}

fn levenshtein_distance(s1: &str, s2: &str) -> usize {
    let s2_len = s2.chars().count();
    let mut previous: Vec<usize> = (0..=s2_len).collect();
    let mut current = vec![0; s2_len + 1];

    for (i, char1) in s1.chars().enumerate() {
        current[0] = i + 1;
        for (j, char2) in s2.chars().enumerate() {
            let cost = usize::from(char1 != char2);
            current[j + 1] = (previous[j + 1] + 1)
                .min(current[j] + 1)
                .min(previous[j] + cost);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[s2_len]
}
