/// Separator between the structure identifier and the site residue sequence in a record key.
pub const KEY_SEPARATOR: char = '.';

/// Separator between the segments of a raw structure accession (e.g. `AF-P12345-F1`).
pub const ACCESSION_SEPARATOR: char = '-';

/// Converts a raw column header into its camelCase form.
///
/// Words are split on any non-alphanumeric character, on lower-to-upper case transitions,
/// on the last capital of an acronym followed by a lowercase letter (`XMLHttp` becomes
/// `XML`, `Http`) and between letters and digits. The first word is lower-cased and every
/// following word is capitalized.
///
/// # Examples
///
/// ```
/// use zincsight::core::utils::identifiers::to_camel_case;
///
/// assert_eq!(to_camel_case("pred_zn_coord"), "predZnCoord");
/// assert_eq!(to_camel_case("Mahomes II prediction"), "mahomesIiPrediction");
/// ```
pub fn to_camel_case(raw: &str) -> String {
    let mut camel = String::with_capacity(raw.len());
    for (i, word) in split_words(raw).iter().enumerate() {
        let lower = word.to_lowercase();
        if i == 0 {
            camel.push_str(&lower);
            continue;
        }
        let mut chars = lower.chars();
        if let Some(first) = chars.next() {
            camel.extend(first.to_uppercase());
            camel.push_str(chars.as_str());
        }
    }
    camel
}

fn split_words(raw: &str) -> Vec<String> {
    let chars: Vec<char> = raw.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }

        if let Some(prev) = current.chars().last() {
            let next = chars.get(i + 1).copied();
            let boundary = (prev.is_lowercase() && c.is_uppercase())
                || (prev.is_numeric() != c.is_numeric())
                || (prev.is_uppercase()
                    && c.is_uppercase()
                    && next.is_some_and(|n| n.is_lowercase()));
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }

    if !current.is_empty() {
        words.push(current);
    }
    words
}

/// Normalizes a binding-residue composition into an order-independent signature.
///
/// Every character outside `[A-Za-z0-9_]` is dropped and the remaining characters are
/// sorted by code point, so `HIS/HIS#CYS` and `CYS,HIS,HIS` share one signature.
pub fn residue_signature(raw: &str) -> String {
    let mut chars: Vec<char> = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    chars.sort_unstable();
    chars.into_iter().collect()
}

/// Extracts the structure identifier (the second `-`-separated segment) from a raw accession.
///
/// Returns `None` when the accession has no second segment.
pub fn structure_id_from_accession(accession: &str) -> Option<&str> {
    accession.split(ACCESSION_SEPARATOR).nth(1)
}

/// Builds the row identity of a prediction: `{structure_id}.{site_residue_sequence}`.
pub fn record_key(structure_id: &str, site_residue_sequence: &str) -> String {
    let mut key = String::with_capacity(structure_id.len() + site_residue_sequence.len() + 1);
    key.push_str(structure_id);
    key.push(KEY_SEPARATOR);
    key.push_str(site_residue_sequence);
    key
}
