use rand::seq::IndexedRandom;

/// Two-letter fragments every submission must contain.
pub const PROMPTS: [&str; 50] = [
    "ar", "be", "co", "in", "ex", "re", "st", "un", "de", "ab", "ad", "an", "as", "at", "if", "of",
    "on", "or", "to", "up", "ly", "ed", "en", "ic", "al", "er", "nt", "ma", "pa", "si", "li", "go",
    "lo", "me", "by", "id", "am", "it", "ox", "pi", "ce", "ra", "ch", "pr", "di", "fi", "nu", "vi",
    "ta", "mi",
];

/// Picks a prompt uniformly at random.
pub fn draw_prompt() -> &'static str {
    PROMPTS.choose(&mut rand::rng()).copied().unwrap_or(PROMPTS[0])
}
