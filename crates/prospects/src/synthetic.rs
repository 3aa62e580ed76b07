//! Deterministic synthetic prospects.
//!
//! Output is a pure function of the requested id: the same id always yields a
//! byte-identical prospect, and ids that are not UUIDs yield nothing. Nothing
//! here reads the clock or a random source.

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use prospector_core::{ActivityId, ProspectId};

use crate::{Activity, ActivityKind, ProspectStatus, SyntheticProspect, sort_by_recency};

const FIRST_NAMES: &[&str] = &[
    "Avery", "Blake", "Casey", "Devon", "Emerson", "Finley", "Harper", "Jordan", "Kendall", "Logan",
    "Morgan", "Parker", "Quinn", "Reese", "Rowan", "Sawyer",
];

const LAST_NAMES: &[&str] = &[
    "Alvarez", "Bennett", "Chen", "Dubois", "Eriksen", "Fischer", "Gupta", "Hughes", "Ivanova", "Jensen",
    "Kowalski", "Lindqvist", "Moreau", "Nakamura", "Okafor", "Patel",
];

const COMPANIES: &[(&str, &str)] = &[
    ("Acme Logistics", "acmelogistics.com"),
    ("Brightline Health", "brightlinehealth.io"),
    ("Cobalt Analytics", "cobaltanalytics.com"),
    ("Driftwood Studios", "driftwood.studio"),
    ("Evergreen Capital", "evergreencap.com"),
    ("Foundry Robotics", "foundryrobotics.ai"),
    ("Granite Security", "granitesec.com"),
    ("Harbor Foods", "harborfoods.co"),
];

const TITLES: &[&str] = &[
    "Head of Sales",
    "VP Marketing",
    "Operations Manager",
    "CTO",
    "Procurement Lead",
    "Founder & CEO",
    "Director of Growth",
    "Customer Success Manager",
];

const SUMMARIES: &[(ActivityKind, &str)] = &[
    (ActivityKind::Email, "Sent introductory email"),
    (ActivityKind::Email, "Followed up on pricing question"),
    (ActivityKind::Call, "Discovery call, discussed current tooling"),
    (ActivityKind::Call, "Left voicemail"),
    (ActivityKind::Meeting, "Product demo with the team"),
    (ActivityKind::Note, "Budget approved for next quarter"),
    (ActivityKind::Note, "Prefers contact on Tuesdays"),
];

const MAX_ACTIVITIES: u64 = 4;

/// Fixed origin for synthetic timestamps (2024-01-01T00:00:00Z).
fn epoch() -> DateTime<Utc> {
    Utc.timestamp_opt(1_704_067_200, 0).single().unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Synthesize the prospect for `id`, or `None` when `id` is not a UUID.
pub fn synthesize(id: &str) -> Option<SyntheticProspect> {
    let uuid = Uuid::parse_str(id.trim()).ok()?;
    if uuid.is_nil() {
        return None;
    }

    let prospect_id = ProspectId::from_uuid(uuid);
    let mut seed = Seed::from_uuid(&uuid);

    let first = pick(FIRST_NAMES, seed.next());
    let last = pick(LAST_NAMES, seed.next());
    let (company, domain) = *pick(COMPANIES, seed.next());
    let title = pick(TITLES, seed.next());
    let status = *pick(&ProspectStatus::ALL, seed.next());

    let created_at = epoch() + Duration::minutes((seed.next() % (365 * 24 * 60)) as i64);

    let count = seed.next() % (MAX_ACTIVITIES + 1);
    let mut activities = Vec::with_capacity(count as usize);
    let mut at = created_at;
    for _ in 0..count {
        at += Duration::hours(1 + (seed.next() % (14 * 24)) as i64);
        let (kind, summary) = *pick(SUMMARIES, seed.next());
        activities.push(Activity {
            id: ActivityId::from_uuid(Uuid::from_u64_pair(seed.next(), seed.next())),
            prospect_id,
            kind,
            summary: summary.to_string(),
            occurred_at: at,
        });
    }
    sort_by_recency(&mut activities);

    let updated_at = activities.first().map(|a| a.occurred_at).unwrap_or(created_at);

    Some(SyntheticProspect {
        id: prospect_id,
        name: format!("{first} {last}"),
        email: format!("{}.{}@{domain}", first.to_lowercase(), last.to_lowercase()),
        company: company.to_string(),
        title: title.to_string(),
        status,
        created_at,
        updated_at,
        activities,
    })
}

fn pick<T>(items: &[T], roll: u64) -> &T {
    &items[(roll % items.len() as u64) as usize]
}

/// SplitMix64 stream seeded from the id's 128 bits.
struct Seed(u64);

impl Seed {
    fn from_uuid(uuid: &Uuid) -> Self {
        let (hi, lo) = uuid.as_u64_pair();
        Self(hi ^ lo.rotate_left(32))
    }

    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn non_uuid_ids_cannot_be_mapped() {
        assert_eq!(synthesize("unknown-id"), None);
        assert_eq!(synthesize(""), None);
        assert_eq!(synthesize("00000000-0000-0000-0000-000000000000"), None);
    }

    #[test]
    fn echoes_the_requested_id() {
        let id = "0190a5b2-6c1e-7d3f-8a4b-9c0d1e2f3a4b";
        let p = synthesize(id).unwrap();
        assert_eq!(p.id.to_string(), id);
        assert!(p.activities.iter().all(|a| a.prospect_id == p.id));
    }

    #[test]
    fn different_ids_usually_differ() {
        let a = synthesize("0190a5b2-6c1e-7d3f-8a4b-9c0d1e2f3a4b").unwrap();
        let b = synthesize("0190a5b2-6c1e-7d3f-8a4b-9c0d1e2f3a4c").unwrap();
        assert_ne!(
            serde_json::to_vec(&a).unwrap(),
            serde_json::to_vec(&b).unwrap()
        );
    }

    proptest! {
        #[test]
        fn byte_identical_for_the_same_id(bits in any::<u128>().prop_filter("non-nil", |b| *b != 0)) {
            let id = Uuid::from_u128(bits).to_string();
            let first = serde_json::to_vec(&synthesize(&id).unwrap()).unwrap();
            let second = serde_json::to_vec(&synthesize(&id).unwrap()).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn well_shaped(bits in any::<u128>().prop_filter("non-nil", |b| *b != 0)) {
            let p = synthesize(&Uuid::from_u128(bits).to_string()).unwrap();
            prop_assert!(p.email.contains('@'));
            prop_assert!(p.activities.len() as u64 <= MAX_ACTIVITIES);
            prop_assert!(p.activities.windows(2).all(|w| w[0].occurred_at >= w[1].occurred_at));
            prop_assert!(p.updated_at >= p.created_at);
        }

        #[test]
        fn arbitrary_strings_never_panic(s in ".{0,48}") {
            let _ = synthesize(&s);
        }
    }
}
