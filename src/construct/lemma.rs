//! Verb lemmatization: a closed irregular table plus inflection-suffix
//! rules. Only verbs reach this module, so the rules can be aggressive
//! about stripping `-s`/`-ed`/`-ing` endings.

/// Irregular past/participle/present forms, lowercase.
const IRREGULAR: &[(&str, &str)] = &[
    ("am", "be"),
    ("is", "be"),
    ("are", "be"),
    ("was", "be"),
    ("were", "be"),
    ("been", "be"),
    ("has", "have"),
    ("had", "have"),
    ("did", "do"),
    ("done", "do"),
    ("does", "do"),
    ("goes", "go"),
    ("went", "go"),
    ("gone", "go"),
    ("ran", "run"),
    ("made", "make"),
    ("came", "come"),
    ("saw", "see"),
    ("seen", "see"),
    ("took", "take"),
    ("taken", "take"),
    ("gave", "give"),
    ("given", "give"),
    ("got", "get"),
    ("gotten", "get"),
    ("grew", "grow"),
    ("grown", "grow"),
    ("knew", "know"),
    ("known", "know"),
    ("found", "find"),
    ("lost", "lose"),
    ("left", "leave"),
    ("led", "lead"),
    ("met", "meet"),
    ("paid", "pay"),
    ("said", "say"),
    ("told", "tell"),
    ("kept", "keep"),
    ("held", "hold"),
    ("felt", "feel"),
    ("stood", "stand"),
    ("built", "build"),
    ("sold", "sell"),
    ("bought", "buy"),
    ("brought", "bring"),
    ("thought", "think"),
    ("sent", "send"),
    ("spent", "spend"),
    ("fell", "fall"),
    ("fallen", "fall"),
    ("began", "begin"),
    ("begun", "begin"),
    ("wrote", "write"),
    ("written", "write"),
    ("spoke", "speak"),
    ("spoken", "speak"),
    ("broke", "break"),
    ("broken", "break"),
    ("chose", "choose"),
    ("chosen", "choose"),
    ("won", "win"),
    ("wore", "wear"),
    ("worn", "wear"),
    ("ate", "eat"),
    ("eaten", "eat"),
    ("drew", "draw"),
    ("drawn", "draw"),
    ("flew", "fly"),
    ("flown", "fly"),
    ("died", "die"),
    ("dying", "die"),
];

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Restore a dropped final `e` after suffix stripping. Stems ending in a
/// soft consonant ("clos", "liv", "danc") took their suffix in place of
/// the `e`; stems ending in a consonant cluster ("found", "walk") did not.
fn restore_e(stem: &str) -> String {
    let mut chars = stem.chars().rev();
    let last = chars.next();
    let prev = chars.next();
    match (prev, last) {
        (Some(p), Some(l)) if is_vowel(p) && matches!(l, 's' | 'v' | 'c' | 'z' | 'g' | 'u') => {
            format!("{stem}e")
        }
        _ => stem.to_string(),
    }
}

fn ends_doubled_consonant(stem: &str) -> bool {
    let mut chars = stem.chars().rev();
    match (chars.next(), chars.next()) {
        (Some(a), Some(b)) => a == b && !is_vowel(a),
        _ => false,
    }
}

/// Base form of an inflected verb. Unknown regular forms go through
/// suffix rules; anything unrecognized comes back unchanged.
pub fn lemmatize(verb: &str) -> String {
    let lower = verb.to_lowercase();
    if let Some((_, base)) = IRREGULAR.iter().find(|(form, _)| *form == lower) {
        return (*base).to_string();
    }

    if let Some(stem) = lower.strip_suffix("ies") {
        if !stem.is_empty() {
            return format!("{stem}y");
        }
    }
    if let Some(stem) = lower.strip_suffix("ied") {
        // Short stems kept the "ie" ("tied" -> "tie"), long ones traded a
        // "y" for it ("studied" -> "study").
        return if stem.len() <= 2 {
            format!("{stem}ie")
        } else {
            format!("{stem}y")
        };
    }
    if let Some(stem) = lower.strip_suffix("ed") {
        if stem.is_empty() {
            return lower;
        }
        if ends_doubled_consonant(stem) {
            return stem[..stem.len() - 1].to_string();
        }
        return restore_e(stem);
    }
    if let Some(stem) = lower.strip_suffix("ing") {
        if stem.is_empty() {
            return lower;
        }
        if ends_doubled_consonant(stem) {
            return stem[..stem.len() - 1].to_string();
        }
        return restore_e(stem);
    }
    if lower.ends_with("sses") || lower.ends_with("shes") || lower.ends_with("ches")
        || lower.ends_with("xes") || lower.ends_with("zes")
    {
        return lower[..lower.len() - 2].to_string();
    }
    if let Some(stem) = lower.strip_suffix('s') {
        if !stem.is_empty() && !stem.ends_with('s') && !stem.ends_with('u') {
            return stem.to_string();
        }
    }
    lower
}
