// Polarity lexicon
//
// Fast keyword-table scorer producing a polarity in [-1.0, 1.0].
// Matched word valences are averaged; a preceding negation word flips
// and dampens the valence. Unmatched text scores 0.0 (neutral).

/// (word, valence)
const VALENCE_TABLE: &[(&str, f64)] = &[
    // Positive
    ("good", 0.7),
    ("great", 0.8),
    ("wonderful", 1.0),
    ("well", 0.4),
    ("better", 0.5),
    ("best", 0.9),
    ("happy", 0.8),
    ("happier", 0.6),
    ("glad", 0.6),
    ("hope", 0.5),
    ("hopeful", 0.6),
    ("calm", 0.4),
    ("calmer", 0.4),
    ("love", 0.6),
    ("loved", 0.6),
    ("excited", 0.7),
    ("amazing", 0.9),
    ("excellent", 1.0),
    ("fine", 0.3),
    ("okay", 0.2),
    ("improving", 0.5),
    ("improved", 0.5),
    ("proud", 0.7),
    ("grateful", 0.8),
    ("thankful", 0.7),
    ("safe", 0.4),
    ("supported", 0.5),
    ("relaxed", 0.5),
    ("peaceful", 0.6),
    ("joy", 0.8),
    ("fantastic", 0.9),
    ("awesome", 1.0),
    ("strong", 0.4),
    ("stronger", 0.5),
    ("positive", 0.6),
    ("progress", 0.4),
    ("relief", 0.5),
    ("relieved", 0.6),
    ("encouraged", 0.6),
    ("comforted", 0.5),
    // Negative
    ("bad", -0.5),
    ("sad", -0.5),
    ("down", -0.3),
    ("low", -0.3),
    ("tired", -0.3),
    ("exhausted", -0.6),
    ("terrible", -0.8),
    ("awful", -0.9),
    ("horrible", -0.9),
    ("hopeless", -0.9),
    ("helpless", -0.8),
    ("worthless", -0.9),
    ("useless", -0.7),
    ("miserable", -0.8),
    ("depressed", -0.7),
    ("depressing", -0.6),
    ("anxious", -0.4),
    ("anxiety", -0.4),
    ("worried", -0.4),
    ("worry", -0.4),
    ("scared", -0.6),
    ("afraid", -0.6),
    ("terrified", -0.8),
    ("angry", -0.6),
    ("upset", -0.5),
    ("hurt", -0.5),
    ("hurting", -0.6),
    ("pain", -0.6),
    ("painful", -0.7),
    ("lonely", -0.6),
    ("alone", -0.3),
    ("isolated", -0.5),
    ("stressed", -0.4),
    ("stressful", -0.4),
    ("overwhelmed", -0.6),
    ("overwhelming", -0.6),
    ("struggling", -0.5),
    ("struggle", -0.4),
    ("crying", -0.6),
    ("cry", -0.5),
    ("fear", -0.6),
    ("panic", -0.7),
    ("numb", -0.4),
    ("empty", -0.5),
    ("lost", -0.4),
    ("broken", -0.6),
    ("unbearable", -0.9),
    ("devastated", -0.9),
    ("ashamed", -0.6),
    ("shame", -0.6),
    ("guilty", -0.5),
    ("guilt", -0.5),
    ("hate", -0.7),
    ("hated", -0.7),
    ("worse", -0.6),
    ("worst", -0.9),
    ("suffering", -0.8),
    ("suffer", -0.7),
    ("dread", -0.7),
    ("despair", -0.9),
    ("tough", -0.3),
    ("hard", -0.2),
    ("difficult", -0.3),
];

/// Words that invert the valence of the word that follows them.
const NEGATIONS: &[&str] = &[
    "not", "never", "no", "dont", "don't", "cant", "can't", "isnt", "isn't", "wasnt", "wasn't",
];

fn lookup(word: &str) -> Option<f64> {
    VALENCE_TABLE
        .iter()
        .find(|(w, _)| *w == word)
        .map(|(_, v)| *v)
}

/// Score the polarity of a message in [-1.0, 1.0].
///
/// The score is the mean valence of recognised words. A negation word
/// immediately before a recognised word flips its sign and halves its
/// weight ("not good" reads mildly negative, not mildly positive).
/// Messages with no recognised words score exactly 0.0.
pub fn polarity(message: &str) -> f64 {
    let lower = message.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|t| !t.is_empty())
        .collect();

    let mut sum = 0.0;
    let mut hits = 0usize;

    for (i, token) in tokens.iter().enumerate() {
        let Some(valence) = lookup(token) else {
            continue;
        };
        let negated = i > 0 && NEGATIONS.contains(&tokens[i - 1]);
        sum += if negated { -valence * 0.5 } else { valence };
        hits += 1;
    }

    if hits == 0 {
        return 0.0;
    }

    (sum / hits as f64).clamp(-1.0, 1.0)
}
