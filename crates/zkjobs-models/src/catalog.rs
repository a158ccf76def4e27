//! Synthetic job catalog.
//!
//! Used by the API server as its data source and by the client's mock network
//! layer. Generation is driven by a seeded RNG so the same seed always yields
//! the same catalog.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::envelope::PaginatedResponse;
use crate::filter::JobFilter;
use crate::job::{Criterion, CriterionStatus, Job, JobId};

/// Location value that selects remote postings when used as a filter.
pub const REMOTE_LOCATION: &str = "Remote";

const TITLES: &[&str] = &[
    "Protocol Engineer",
    "Zero-Knowledge Researcher",
    "Rust Backend Engineer",
    "Privacy Engineer",
    "Cryptography Engineer",
    "Security Auditor",
    "Frontend Engineer",
    "Developer Advocate",
    "Site Reliability Engineer",
    "Product Designer",
];

const COMPANIES: &[&str] = &[
    "Nullifier Labs",
    "Shielded Systems",
    "Merkle & Co",
    "Blind Signature GmbH",
    "Commitment Works",
    "Plonkish",
    "Halo Collective",
    "Stealth Address Inc",
];

const LOCATIONS: &[&str] = &[
    REMOTE_LOCATION,
    "Berlin, DE",
    "Zurich, CH",
    "Lisbon, PT",
    "New York, US",
    "Singapore, SG",
    "London, UK",
];

const CRITERIA: &[&str] = &[
    "Age over 18",
    "Right to work in the EU",
    "Verified university degree",
    "Five years of experience",
    "No sanctions list match",
    "Holds a security clearance",
    "Proof of residency",
];

/// In-memory set of postings, kept sorted newest first.
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: Vec<Job>,
}

impl JobCatalog {
    /// Build a deterministic catalog of `size` postings from `seed`.
    pub fn generate(seed: u64, size: usize) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let newest = catalog_epoch();

        let jobs = (0..size)
            .map(|i| {
                let location = LOCATIONS[rng.random_range(0..LOCATIONS.len())];
                let remote = location == REMOTE_LOCATION || rng.random_bool(0.2);
                let age_minutes = rng.random_range(0..60 * 24 * 60);

                let mut labels = CRITERIA.to_vec();
                labels.shuffle(&mut rng);
                let criteria_count = rng.random_range(2..=4);
                let criteria = labels
                    .into_iter()
                    .take(criteria_count)
                    .map(|label| {
                        let status = if rng.random_bool(0.7) {
                            CriterionStatus::Pass
                        } else {
                            CriterionStatus::Fail
                        };
                        Criterion::new(label, status)
                    })
                    .collect();

                Job {
                    id: JobId::from_string(format!("job-{:04}", i + 1)),
                    title: TITLES[rng.random_range(0..TITLES.len())].to_string(),
                    company: COMPANIES[rng.random_range(0..COMPANIES.len())].to_string(),
                    location: location.to_string(),
                    remote,
                    posted_at: newest - Duration::minutes(age_minutes),
                    criteria,
                }
            })
            .collect();

        Self::from_jobs(jobs)
    }

    /// Wrap existing postings.
    pub fn from_jobs(mut jobs: Vec<Job>) -> Self {
        sort_newest_first(&mut jobs);
        Self { jobs }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|job| job.id.as_str() == id)
    }

    /// Filter, sort and paginate.
    pub fn query(&self, filter: &JobFilter) -> PaginatedResponse<Job> {
        let matching: Vec<Job> = self
            .jobs
            .iter()
            .filter(|job| matches_filter(job, filter))
            .cloned()
            .collect();

        PaginatedResponse::from_slice(
            &matching,
            filter.effective_limit(),
            filter.effective_offset(),
        )
    }
}

/// Whether `job` satisfies every set field of `filter`.
pub fn matches_filter(job: &Job, filter: &JobFilter) -> bool {
    if let Some(remote) = filter.remote {
        if job.remote != remote {
            return false;
        }
    }

    if let Some(location) = filter.location.as_deref().map(str::trim) {
        if location.eq_ignore_ascii_case(REMOTE_LOCATION) {
            if !job.remote {
                return false;
            }
        } else if !contains_ignore_case(&job.location, location) {
            return false;
        }
    }

    if let Some(search) = filter.search.as_deref().map(str::trim) {
        let hit = contains_ignore_case(&job.title, search)
            || contains_ignore_case(&job.company, search)
            || job
                .criteria
                .iter()
                .any(|c| contains_ignore_case(&c.label, search));
        if !hit {
            return false;
        }
    }

    true
}

/// Newest first, ties broken by id so the order is total.
pub fn sort_newest_first(jobs: &mut [Job]) {
    jobs.sort_by(|a, b| b.posted_at.cmp(&a.posted_at).then_with(|| a.id.cmp(&b.id)));
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn catalog_epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}
