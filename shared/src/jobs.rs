use serde::{Deserialize, Serialize};

use crate::rankings::ALL_JOBS;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobCategory {
    pub value: String,
    pub label: String,
}

/// Filter buttons in display order: `(value, label)`.
pub const JOB_CATEGORIES: [(&str, &str); 14] = [
    (ALL_JOBS, "All Jobs"),
    ("beginner", "Beginner"),
    ("noblesse", "Noblesse"),
    ("warrior", "Warrior"),
    ("dawn-warrior", "Dawn Warrior"),
    ("magician", "Magician"),
    ("blaze-wizard", "Blaze Wizard"),
    ("archer", "Bowman"),
    ("wind-archer", "Wind Archer"),
    ("thief", "Thief"),
    ("night-walker", "Night Walker"),
    ("pirate", "Pirate"),
    ("thunder-breaker", "Thunder Breaker"),
    ("aran", "Aran"),
];

pub fn job_categories() -> Vec<JobCategory> {
    JOB_CATEGORIES
        .iter()
        .map(|(value, label)| JobCategory {
            value: (*value).to_string(),
            label: (*label).to_string(),
        })
        .collect()
}

pub fn is_known_category(value: &str) -> bool {
    JOB_CATEGORIES.iter().any(|(known, _)| *known == value)
}

/// Display label for a category value; `archer` reads as "Bowman".
pub fn category_label(value: &str) -> String {
    JOB_CATEGORIES
        .iter()
        .find(|(known, _)| *known == value)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| capitalize(value))
}

/// Category a job id belongs to. GM and unknown branches have none.
pub fn category_for_job(job_id: u32) -> Option<&'static str> {
    match job_id {
        0 => Some("beginner"),
        100..=132 => Some("warrior"),
        200..=232 => Some("magician"),
        300..=322 => Some("archer"),
        400..=422 => Some("thief"),
        500..=522 => Some("pirate"),
        1000 => Some("noblesse"),
        1100..=1112 => Some("dawn-warrior"),
        1200..=1212 => Some("blaze-wizard"),
        1300..=1312 => Some("wind-archer"),
        1400..=1412 => Some("night-walker"),
        1500..=1512 => Some("thunder-breaker"),
        2000 | 2100..=2112 => Some("aran"),
        _ => None,
    }
}

pub fn job_matches(category: &str, job_id: u32) -> bool {
    category == ALL_JOBS || category_for_job(job_id) == Some(category)
}

pub fn job_name(job_id: u32) -> &'static str {
    match job_id {
        0 => "Beginner",
        100 => "Warrior",
        110 => "Fighter",
        111 => "Crusader",
        112 => "Hero",
        120 => "Page",
        121 => "White Knight",
        122 => "Paladin",
        130 => "Spearman",
        131 => "Dragon Knight",
        132 => "Dark Knight",
        200 => "Magician",
        210 => "Wizard (F/P)",
        211 => "Mage (F/P)",
        212 => "Arch Mage (F/P)",
        220 => "Wizard (I/L)",
        221 => "Mage (I/L)",
        222 => "Arch Mage (I/L)",
        230 => "Cleric",
        231 => "Priest",
        232 => "Bishop",
        300 => "Bowman",
        310 => "Hunter",
        311 => "Ranger",
        312 => "Bowmaster",
        320 => "Crossbowman",
        321 => "Sniper",
        322 => "Marksman",
        400 => "Thief",
        410 => "Assassin",
        411 => "Hermit",
        412 => "Night Lord",
        420 => "Bandit",
        421 => "Chief Bandit",
        422 => "Shadower",
        500 => "Pirate",
        510 => "Brawler",
        511 => "Marauder",
        512 => "Buccaneer",
        520 => "Gunslinger",
        521 => "Outlaw",
        522 => "Corsair",
        900 | 910 => "GM",
        1000 => "Noblesse",
        1100..=1112 => "Dawn Warrior",
        1200..=1212 => "Blaze Wizard",
        1300..=1312 => "Wind Archer",
        1400..=1412 => "Night Walker",
        1500..=1512 => "Thunder Breaker",
        2000 => "Legend",
        2100..=2112 => "Aran",
        _ => "Unknown",
    }
}

/// File stem of the category's icon under `/assets/job-icons/`.
pub fn icon_file(value: &str) -> &'static str {
    match value {
        "beginner" => "beginner",
        "noblesse" => "noblesse",
        "warrior" => "warrior",
        "dawn-warrior" => "dawn_warrior",
        "magician" => "magician",
        "blaze-wizard" => "blaze_wizard",
        "archer" => "bowman",
        "wind-archer" => "wind_archer",
        "thief" => "thief",
        "night-walker" => "night_walker",
        "pirate" => "pirate",
        "thunder-breaker" => "thunder_breaker",
        "aran" => "aran",
        _ => "all",
    }
}

/// Glyph shown when the icon image fails to load.
pub fn icon_glyph(value: &str) -> &'static str {
    match value {
        ALL_JOBS => "\u{2694}\u{FE0F}",
        "beginner" | "noblesse" => "\u{1F476}",
        "warrior" | "dawn-warrior" => "\u{1F6E1}\u{FE0F}",
        "magician" | "blaze-wizard" => "\u{1F52E}",
        "archer" | "bowman" | "wind-archer" => "\u{1F3F9}",
        "thief" | "night-walker" => "\u{1F5E1}\u{FE0F}",
        "pirate" | "thunder-breaker" => "\u{2693}",
        "aran" => "\u{2744}\u{FE0F}",
        _ => "\u{2753}",
    }
}

/// Glyph for a character's job id. GM and unmapped ids get the placeholder.
pub fn job_glyph(job_id: u32) -> &'static str {
    category_for_job(job_id).map_or("\u{2753}", icon_glyph)
}

fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explorer_and_cygnus_branches_map_to_categories() {
        assert_eq!(category_for_job(0), Some("beginner"));
        assert_eq!(category_for_job(112), Some("warrior"));
        assert_eq!(category_for_job(322), Some("archer"));
        assert_eq!(category_for_job(522), Some("pirate"));
        assert_eq!(category_for_job(1000), Some("noblesse"));
        assert_eq!(category_for_job(1511), Some("thunder-breaker"));
        assert_eq!(category_for_job(2000), Some("aran"));
        assert_eq!(category_for_job(2112), Some("aran"));
        assert_eq!(category_for_job(900), None);
    }

    #[test]
    fn all_matches_every_job_including_gm() {
        assert!(job_matches("all", 900));
        assert!(job_matches("pirate", 510));
        assert!(!job_matches("pirate", 410));
    }

    #[test]
    fn archer_is_labelled_bowman() {
        assert_eq!(category_label("archer"), "Bowman");
        assert_eq!(category_label("dawn-warrior"), "Dawn Warrior");
        assert_eq!(category_label("legend"), "Legend");
        assert_eq!(icon_file("archer"), "bowman");
    }

    #[test]
    fn categories_are_listed_with_all_first() {
        let categories = job_categories();
        assert_eq!(categories.len(), 14);
        assert_eq!(categories[0].value, "all");
        assert!(is_known_category("thunder-breaker"));
        assert!(!is_known_category("gm"));
    }

    #[test]
    fn unknown_icon_values_use_placeholder_glyph() {
        assert_eq!(icon_glyph("pirate"), "\u{2693}");
        assert_eq!(icon_glyph("nope"), "\u{2753}");
        assert_eq!(icon_file("nope"), "all");
    }

    #[test]
    fn gm_and_unmapped_jobs_do_not_borrow_the_beginner_glyph() {
        assert_eq!(job_glyph(0), icon_glyph("beginner"));
        assert_eq!(job_glyph(900), "\u{2753}");
        assert_eq!(job_glyph(9999), "\u{2753}");
        assert_eq!(job_glyph(2112), icon_glyph("aran"));
    }
}
