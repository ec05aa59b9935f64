//! Country name / dial code / ISO code resolution and flag CDN URLs.
//!
//! Trader and offer records carry countries in whatever form the seller
//! typed: Arabic names, English names, bare ISO codes or phone dial codes.

use once_cell::sync::Lazy;
use std::collections::HashMap;

static NAME_TO_ISO: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        // Arabic names
        ("السعودية", "sa"),
        ("المملكة العربية السعودية", "sa"),
        ("الإمارات", "ae"),
        ("الامارات", "ae"),
        ("مصر", "eg"),
        ("الأردن", "jo"),
        ("الاردن", "jo"),
        ("لبنان", "lb"),
        ("العراق", "iq"),
        ("الكويت", "kw"),
        ("قطر", "qa"),
        ("البحرين", "bh"),
        ("عمان", "om"),
        ("اليمن", "ye"),
        ("تونس", "tn"),
        ("الجزائر", "dz"),
        ("المغرب", "ma"),
        ("السودان", "sd"),
        ("الصين", "cn"),
        ("الهند", "in"),
        ("تركيا", "tr"),
        ("باكستان", "pk"),
        ("اليابان", "jp"),
        ("كوريا", "kr"),
        ("ألمانيا", "de"),
        ("فرنسا", "fr"),
        ("إيطاليا", "it"),
        ("إسبانيا", "es"),
        ("روسيا", "ru"),
        ("البرازيل", "br"),
        ("ماليزيا", "my"),
        ("إندونيسيا", "id"),
        ("تايلاند", "th"),
        ("فيتنام", "vn"),
        ("الفلبين", "ph"),
        ("بنغلاديش", "bd"),
        ("سنغافورة", "sg"),
        // English names
        ("SAUDI ARABIA", "sa"),
        ("SAUDI", "sa"),
        ("UNITED ARAB EMIRATES", "ae"),
        ("UAE", "ae"),
        ("EGYPT", "eg"),
        ("JORDAN", "jo"),
        ("LEBANON", "lb"),
        ("IRAQ", "iq"),
        ("KUWAIT", "kw"),
        ("QATAR", "qa"),
        ("BAHRAIN", "bh"),
        ("OMAN", "om"),
        ("YEMEN", "ye"),
        ("TUNISIA", "tn"),
        ("ALGERIA", "dz"),
        ("MOROCCO", "ma"),
        ("SUDAN", "sd"),
        ("CHINA", "cn"),
        ("INDIA", "in"),
        ("TURKEY", "tr"),
        ("TURKIYE", "tr"),
        ("PAKISTAN", "pk"),
        ("JAPAN", "jp"),
        ("KOREA", "kr"),
        ("SOUTH KOREA", "kr"),
        ("GERMANY", "de"),
        ("FRANCE", "fr"),
        ("ITALY", "it"),
        ("SPAIN", "es"),
        ("RUSSIA", "ru"),
        ("BRAZIL", "br"),
        ("UNITED KINGDOM", "gb"),
        ("UK", "gb"),
        ("UNITED STATES", "us"),
        ("USA", "us"),
        ("MALAYSIA", "my"),
        ("INDONESIA", "id"),
        ("THAILAND", "th"),
        ("VIETNAM", "vn"),
        ("PHILIPPINES", "ph"),
        ("BANGLADESH", "bd"),
        ("SINGAPORE", "sg"),
    ])
});

static DIAL_TO_ISO: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("+966", "sa"),
        ("+971", "ae"),
        ("+20", "eg"),
        ("+962", "jo"),
        ("+961", "lb"),
        ("+964", "iq"),
        ("+965", "kw"),
        ("+974", "qa"),
        ("+973", "bh"),
        ("+968", "om"),
        ("+967", "ye"),
        ("+90", "tr"),
        ("+86", "cn"),
        ("+91", "in"),
        ("+1", "us"),
        ("+44", "gb"),
        ("+49", "de"),
        ("+33", "fr"),
        ("+39", "it"),
        ("+81", "jp"),
        ("+82", "kr"),
        ("+55", "br"),
        ("+92", "pk"),
        ("+212", "ma"),
        ("+213", "dz"),
        ("+216", "tn"),
    ])
});

/// Convert any country representation to a lowercase ISO 2-letter code.
/// Accepts `"SA"`, `"Saudi Arabia"`, `"السعودية"`, `"+966"` and so on.
pub fn country_code(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    if trimmed.starts_with('+') {
        if let Some(iso) = DIAL_TO_ISO.get(trimmed) {
            return Some((*iso).to_string());
        }
    }

    let upper = trimmed.to_uppercase();

    if let Some(iso) = NAME_TO_ISO.get(upper.as_str()) {
        return Some((*iso).to_string());
    }

    if upper.len() == 2 && upper.chars().all(|c| c.is_ascii_uppercase()) {
        return Some(upper.to_lowercase());
    }

    // Partial match, e.g. "Saudi" inside "SAUDI ARABIA".
    for (name, iso) in NAME_TO_ISO.iter() {
        if upper.contains(name) || name.contains(upper.as_str()) {
            return Some((*iso).to_string());
        }
    }

    None
}

/// First resolvable code among several candidate sources
/// (offer country, trader country, trader code, item country).
pub fn resolve_country_code<'a, I>(sources: I) -> Option<String>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    sources
        .into_iter()
        .flatten()
        .find_map(|source| country_code(source))
}

/// Flag PNG from flagcdn.com. Valid widths: 20, 40, 80, 160, 256.
pub fn flag_url(iso: &str, width: u32) -> String {
    format!("https://flagcdn.com/w{}/{}.png", width, iso)
}
