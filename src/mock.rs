//! Deterministic mock record generator.
//!
//! Produces raw records shaped exactly like the live database returns them,
//! so a dump can be fed back through the file store and exercised end to
//! end without credentials. Generation is seeded and reproducible across
//! platforms.

use chrono::{Duration, NaiveDateTime};
use uuid::Uuid;

use crate::record::{RawField, RawRecord};

pub const PLATFORMS: &[&str] = &["GP", "AMZ", "iOS", "Fire TV"];

pub const TEAMS: &[&str] = &[
    "AMZ Production Team",
    "AMZ Integration and Port Team",
    "AMZ Growth Team",
    "Tools Team",
];

pub const SUB_TEAMS: &[&str] = &[
    "Growth",
    "KHACHAPURI",
    "FUJI",
    "TOKYO",
    "OSLO",
    "BERLIN",
    "PARIS",
    "LONDON",
    "MIAMI",
    "VEGAS",
    "SYDNEY",
    "MUMBAI",
    "CAIRO",
    "ATHENS",
    "ROME",
    "MADRID",
    "LISBON",
    "DUBLIN",
    "STOCKHOLM",
    "HELSINKI",
    "WARSAW",
    "PRAGUE",
    "VIENNA",
    "BUDAPEST",
    "AMSTERDAM",
];

pub const RELEASE_TYPES: &[&str] = &[
    "CTR Setting Test",
    "First Release",
    "Update",
    "Full Game",
    "A/B Test",
    "Remote A/B Test",
    "Remote Update Subscription",
    "Re-build",
];

/// Transitions a project can realistically take. QA bouncing back to
/// development and LIVE branching into UA or trouble states are deliberate.
pub const STATUS_TRANSITIONS: &[(&str, &str)] = &[
    ("BACKLOG", "WAITING FOR DEV"),
    ("WAITING FOR DEV", "DEVELOPMENT"),
    ("DEVELOPMENT", "QA"),
    ("QA", "DEVELOPMENT"),
    ("QA", "WAITING RELEASE"),
    ("WAITING RELEASE", "RELEASE POOL"),
    ("RELEASE POOL", "LIVE"),
    ("LIVE", "UA TEST"),
    ("UA TEST", "UA SETUP"),
    ("UA SETUP", "UA"),
    ("UA", "UA BOOST"),
    ("UA", "UA PAUSED"),
    ("UA PAUSED", "UA"),
    ("LIVE", "PAUSED"),
    ("PAUSED", "LIVE"),
    ("BACKLOG", "GD CTR TEST"),
    ("GD CTR TEST", "CTR TEST"),
    ("CTR TEST", "CTR TEST DONE"),
    ("CTR TEST DONE", "CTR ARCHIVE"),
    ("CTR ARCHIVE", "DEVELOPMENT"),
    ("LIVE", "BLOCKED"),
    ("LIVE", "SHADOW BAN"),
    ("LIVE", "ARCHIVE"),
];

pub const PROJECT_NAMES: &[&str] = &[
    "Snake Run: Crawl Chase",
    "Dragon Quest Arena",
    "Crystal Match 3D",
    "Tower Defense Pro",
    "Racing Fever Ultimate",
    "Puzzle Kingdom Adventure",
    "Battle Royale Warriors",
    "Farm Heroes Saga",
    "Space Shooter Galaxy",
    "Word Master Challenge",
    "Cooking Frenzy Rush",
    "Zombie Survival Craft",
    "Bubble Pop Mania",
    "Chess Master Online",
    "Card Battle Epic",
    "Idle Tycoon Empire",
    "Match & Merge Quest",
    "Solitaire Journey",
    "Block Puzzle Classic",
    "Hidden Object Mystery",
    "Jewel Blast Adventure",
    "Mahjong Deluxe",
    "Pinball Arcade",
    "Pool Master 3D",
    "Slots Fortune Casino",
];

pub const CHANGE_DESCRIPTIONS: &[&str] = &[
    "Rebuild with single subscription",
    "Fixed crash on iOS 17",
    "Added new levels pack",
    "Performance optimization",
    "UI improvements",
    "Bug fixes and stability improvements",
    "Added holiday theme",
    "Monetization adjustments",
    "Tutorial improvements",
    "Localization updates",
    "Ad placement optimization",
    "New game mode added",
    "Balance adjustments",
    "Graphics quality improvements",
    "Sound effects updated",
    "Leaderboard integration",
    "Social features added",
    "IAP prices adjusted",
    "Retention mechanics improved",
    "Loading time optimized",
];

const NAME_SUFFIXES: &[&str] = &[
    "Deluxe", "Prime", "Saga", "Blitz", "Mania", "Royale", "Quest", "Rush", "Legends", "Frontier",
    "Evolved", "Origins",
];

const FIRST_NAMES: &[&str] = &[
    "Alice", "Boris", "Carmen", "Daniel", "Elena", "Felix", "Greta", "Hugo", "Irina", "Jonas",
    "Katya", "Leo", "Marta", "Nikolai", "Olga", "Pavel",
];

const LAST_NAMES: &[&str] = &[
    "Ivanov", "Smith", "Garcia", "Kim", "Petrov", "Novak", "Tanaka", "Muller", "Rossi", "Silva",
    "Kowalski", "Andersen", "Dubois", "Costa", "Nagy", "Fischer",
];

/// Tiny seeded RNG, reproducible across platforms.
#[derive(Debug, Clone, Copy)]
pub struct SeededRng {
    state: u64,
}

impl SeededRng {
    pub fn new(seed: u64) -> Self {
        SeededRng {
            state: seed ^ 0x9E37_79B9_7F4A_7C15,
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        self.state
    }

    fn next_bounded(&mut self, upper_exclusive: u64) -> u64 {
        if upper_exclusive == 0 {
            return 0;
        }
        self.next_u64() % upper_exclusive
    }

    /// Random value in `[lo, hi]`, both ends inclusive.
    fn in_range(&mut self, lo: u64, hi: u64) -> u64 {
        lo + self.next_bounded(hi - lo + 1)
    }

    fn hit_percent(&mut self, percent: u8) -> bool {
        if percent == 0 {
            return false;
        }
        if percent >= 100 {
            return true;
        }
        self.next_bounded(100) < u64::from(percent)
    }

    fn pick<'a, T>(&mut self, pool: &'a [T]) -> &'a T {
        &pool[self.next_bounded(pool.len() as u64) as usize]
    }
}

/// A status change before dates and identifiers are assigned.
struct Draft {
    project_name: String,
    team: String,
    sub_team: String,
    platform: String,
    version: String,
    previous_status: String,
    new_status: String,
    release_type: String,
    whats_new: String,
    changed_by: String,
}

pub struct MockGenerator {
    rng: SeededRng,
    now: NaiveDateTime,
}

impl MockGenerator {
    pub fn new(seed: u64, now: NaiveDateTime) -> Self {
        MockGenerator {
            rng: SeededRng::new(seed),
            now,
        }
    }

    /// Generate up to `count` raw records spanning the last 30 days.
    /// Projects average five status changes each, so short lifecycles can
    /// leave the output under `count`.
    pub fn generate(&mut self, count: usize) -> Vec<RawRecord> {
        if count == 0 {
            return Vec::new();
        }

        let num_projects = (count / 5).max(1);
        let mut drafts = Vec::new();
        for _ in 0..num_projects {
            let project_name = format!(
                "{} {}",
                self.rng.pick(PROJECT_NAMES),
                self.rng.pick(NAME_SUFFIXES)
            );
            let team = (*self.rng.pick(TEAMS)).to_string();
            let platform = (*self.rng.pick(PLATFORMS)).to_string();
            self.project_lifecycle(&mut drafts, project_name, team, platform);
        }
        drafts.truncate(count);

        let mut dates = Vec::with_capacity(drafts.len());
        for _ in 0..drafts.len() {
            dates.push(self.random_recent_date());
        }
        dates.sort();

        drafts
            .into_iter()
            .zip(dates)
            .map(|(draft, date)| self.into_raw(draft, date))
            .collect()
    }

    /// Walk a project from BACKLOG through 3-8 transitions. A project can
    /// get stuck early, and later stages occasionally bump the version.
    fn project_lifecycle(
        &mut self,
        out: &mut Vec<Draft>,
        project_name: String,
        team: String,
        platform: String,
    ) {
        let mut current = "BACKLOG".to_string();
        let mut version = self.random_version();
        let sub_team = (*self.rng.pick(SUB_TEAMS)).to_string();

        let num_changes = self.rng.in_range(3, 8);
        for _ in 0..num_changes {
            let valid: Vec<&(&str, &str)> = STATUS_TRANSITIONS
                .iter()
                .filter(|(from, _)| *from == current)
                .collect();
            let next = if valid.is_empty() {
                self.rng.pick(STATUS_TRANSITIONS).1
            } else {
                self.rng.pick(&valid).1
            };

            let previous = std::mem::replace(&mut current, next.to_string());

            if matches!(current.as_str(), "QA" | "RELEASE POOL" | "LIVE")
                && self.rng.hit_percent(30)
            {
                version = self.random_version();
            }

            out.push(Draft {
                project_name: project_name.clone(),
                team: team.clone(),
                sub_team: sub_team.clone(),
                platform: platform.clone(),
                version: version.clone(),
                previous_status: previous,
                new_status: current.clone(),
                release_type: (*self.rng.pick(RELEASE_TYPES)).to_string(),
                whats_new: (*self.rng.pick(CHANGE_DESCRIPTIONS)).to_string(),
                changed_by: format!(
                    "{} {}",
                    self.rng.pick(FIRST_NAMES),
                    self.rng.pick(LAST_NAMES)
                ),
            });

            if self.rng.hit_percent(20) {
                break;
            }
        }
    }

    fn random_version(&mut self) -> String {
        format!(
            "{}.{}.{}",
            self.rng.in_range(1, 3),
            self.rng.in_range(0, 15),
            self.rng.in_range(0, 99)
        )
    }

    /// 60% of dates land in the last 7 days, the rest spread over the month.
    fn random_recent_date(&mut self) -> NaiveDateTime {
        let days_ago = if self.rng.hit_percent(60) {
            self.rng.in_range(0, 7)
        } else {
            self.rng.in_range(8, 30)
        };
        self.now
            - Duration::days(days_ago as i64)
            - Duration::hours(self.rng.in_range(0, 23) as i64)
            - Duration::minutes(self.rng.in_range(0, 59) as i64)
    }

    fn record_id(&mut self) -> String {
        let high = self.rng.next_u64() as u128;
        let low = self.rng.next_u64() as u128;
        Uuid::from_u128((high << 64) | low).to_string()
    }

    fn into_raw(&mut self, draft: Draft, date: NaiveDateTime) -> RawRecord {
        let instant = date.format("%Y-%m-%dT%H:%M:%S").to_string();
        let title = format!(
            "{} - {} → {}",
            draft.project_name, draft.previous_status, draft.new_status
        );

        let mut properties = std::collections::BTreeMap::new();
        properties.insert("Log Entry".to_string(), RawField::title(title));
        properties.insert("Date".to_string(), RawField::date(instant.clone()));
        properties.insert(
            "Project Name".to_string(),
            RawField::rich_text(draft.project_name),
        );
        properties.insert("Version".to_string(), RawField::rich_text(draft.version));
        properties.insert("Platform".to_string(), RawField::select(draft.platform));
        properties.insert(
            "Release Type".to_string(),
            RawField::select(draft.release_type),
        );
        properties.insert(
            "Previous Status".to_string(),
            RawField::status(draft.previous_status),
        );
        properties.insert("New Status".to_string(), RawField::status(draft.new_status));
        properties.insert("Team".to_string(), RawField::select(draft.team));
        properties.insert("Sub-team".to_string(), RawField::select(draft.sub_team));
        properties.insert(
            "Changed By".to_string(),
            RawField::people([draft.changed_by]),
        );
        properties.insert("What's New".to_string(), RawField::rich_text(draft.whats_new));
        properties.insert("Automation Source".to_string(), RawField::checkbox(true));

        RawRecord {
            id: self.record_id(),
            created_time: instant.clone(),
            last_edited_time: instant,
            properties,
        }
    }
}
