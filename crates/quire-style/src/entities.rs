//! HTML entity unescaping for url values

/// Longest entity (including `&` and `;`) that is recognised
const MAX_ENTITY_LEN: usize = 10;

/// Named entities, sorted by name
static KNOWN_ENTITIES: &[(&str, char)] = &[
    ("amp", '&'),
    ("apos", '\''),
    ("bull", '\u{2022}'),
    ("cent", '\u{00A2}'),
    ("copy", '\u{00A9}'),
    ("deg", '\u{00B0}'),
    ("divide", '\u{00F7}'),
    ("euro", '\u{20AC}'),
    ("gt", '>'),
    ("hellip", '\u{2026}'),
    ("laquo", '\u{00AB}'),
    ("ldquo", '\u{201C}'),
    ("lsquo", '\u{2018}'),
    ("lt", '<'),
    ("mdash", '\u{2014}'),
    ("middot", '\u{00B7}'),
    ("nbsp", '\u{00A0}'),
    ("ndash", '\u{2013}'),
    ("para", '\u{00B6}'),
    ("plusmn", '\u{00B1}'),
    ("pound", '\u{00A3}'),
    ("quot", '"'),
    ("raquo", '\u{00BB}'),
    ("rdquo", '\u{201D}'),
    ("reg", '\u{00AE}'),
    ("rsquo", '\u{2019}'),
    ("sect", '\u{00A7}'),
    ("times", '\u{00D7}'),
    ("trade", '\u{2122}'),
    ("yen", '\u{00A5}'),
];

fn named_entity(name: &str) -> Option<char> {
    KNOWN_ENTITIES
        .binary_search_by(|(candidate, _)| candidate.cmp(&name))
        .ok()
        .map(|idx| KNOWN_ENTITIES[idx].1)
}

fn numeric_entity(body: &str) -> Option<char> {
    let code = match body.strip_prefix(['x', 'X']) {
        Some(hex) => u32::from_str_radix(hex, 16).ok()?,
        None => body.parse::<u32>().ok()?,
    };
    char::from_u32(code)
}

/// Decode `&name;`, `&#NN;` and `&#xHH;` entities.
///
/// Unknown, malformed and unterminated entities are copied through literally.
pub fn unescape_html(value: &str) -> String {
    if !value.contains('&') {
        return value.to_string();
    }

    let mut out = String::with_capacity(value.len());
    let mut rest = value;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];

        let decoded = candidate
            .char_indices()
            .take(MAX_ENTITY_LEN + 1)
            .find(|(_, c)| *c == ';')
            .and_then(|(end, _)| {
                let body = &candidate[1..end];
                let ch = match body.strip_prefix('#') {
                    Some(number) => numeric_entity(number),
                    None => named_entity(body),
                }?;
                Some((ch, end + 1))
            });

        match decoded {
            Some((ch, consumed)) => {
                out.push(ch);
                rest = &candidate[consumed..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}
