// 🌱 Seeding - load courses, lecturers, sections and reviews into SQLite
//
// Input is four CSV tables. Every row carries a `key` that later tables use
// to reference it (sections.csv names a course key and a lecturer key,
// reviews.csv names a section key). Keys are resolved to store ids here, so
// the stored documents only ever hold real ids.
//
// Re-running a seed is safe: each row is stored with the SHA-256 of
// (collection, key) as its idempotency hash and skipped the second time.

use crate::entities::course::FIELD_COURSE_NUMBER;
use crate::entities::{Course, Lecturer, Review, Section};
use crate::store::sqlite::{find_documents, find_id_by_hash, insert_document};
use crate::store::{Collection, Document};
use anyhow::{bail, Context, Result};
use rusqlite::Connection;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

// ============================================================================
// ROWS
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct CourseRow {
    pub key: String,
    #[serde(rename = "courseNumber")]
    pub course_number: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LecturerRow {
    pub key: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SectionRow {
    pub key: String,
    pub course: String,
    pub lecturer: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRow {
    pub key: String,
    pub section: String,
    pub body: String,
    pub rating: i64,
}

#[derive(Debug, Clone, Default)]
pub struct SeedData {
    pub courses: Vec<CourseRow>,
    pub lecturers: Vec<LecturerRow>,
    pub sections: Vec<SectionRow>,
    pub reviews: Vec<ReviewRow>,
}

const SAMPLE_COURSES: &str = "\
key,courseNumber,name
kiei-451,KIEI-451,Intro to Software Development
kiei-925,KIEI-925,Advanced Software Development
";

const SAMPLE_LECTURERS: &str = "\
key,name
brian,Brian Eng
ben,Ben Block
";

const SAMPLE_SECTIONS: &str = "\
key,course,lecturer
451-brian,kiei-451,brian
451-ben,kiei-451,ben
925-brian,kiei-925,brian
";

const SAMPLE_REVIEWS: &str = "\
key,section,body,rating
r1,451-brian,Great!,5
r2,451-brian,OK,3
r3,925-brian,Challenging but worth it,4
";

impl SeedData {
    /// The built-in KIEI dataset
    pub fn sample() -> Result<Self> {
        Ok(SeedData {
            courses: read_rows(SAMPLE_COURSES.as_bytes()).context("sample courses")?,
            lecturers: read_rows(SAMPLE_LECTURERS.as_bytes()).context("sample lecturers")?,
            sections: read_rows(SAMPLE_SECTIONS.as_bytes()).context("sample sections")?,
            reviews: read_rows(SAMPLE_REVIEWS.as_bytes()).context("sample reviews")?,
        })
    }

    /// Read courses.csv, lecturers.csv, sections.csv and reviews.csv from `dir`
    pub fn from_csv_dir(dir: &Path) -> Result<Self> {
        Ok(SeedData {
            courses: read_csv_file(&dir.join("courses.csv"))?,
            lecturers: read_csv_file(&dir.join("lecturers.csv"))?,
            sections: read_csv_file(&dir.join("sections.csv"))?,
            reviews: read_csv_file(&dir.join("reviews.csv"))?,
        })
    }
}

fn read_csv_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    read_rows(file).with_context(|| format!("Failed to read CSV file: {}", path.display()))
}

fn read_rows<T: DeserializeOwned, R: Read>(reader: R) -> Result<Vec<T>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();

    for (index, result) in rdr.deserialize().enumerate() {
        // +2: header line and 1-based numbering
        let row: T = result.with_context(|| format!("Invalid row at line {}", index + 2))?;
        rows.push(row);
    }

    Ok(rows)
}

// ============================================================================
// SEEDING
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl SeedReport {
    pub fn summary(&self) -> String {
        format!("{} inserted, {} already present", self.inserted, self.skipped)
    }
}

/// Stable hash for a seed row: same collection + key → same hash
pub fn idempotency_hash(collection: Collection, key: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(format!("{}:{}", collection.as_str(), key));
    format!("{:x}", hasher.finalize())
}

/// Write `data` in one transaction. Either every row lands (or was already
/// there) or nothing changes.
pub fn seed(conn: &Connection, data: &SeedData) -> Result<SeedReport> {
    let tx = conn.unchecked_transaction()?;
    let mut seeder = Seeder {
        conn: &tx,
        report: SeedReport::default(),
        ids: HashMap::new(),
    };

    for row in &data.courses {
        seeder.course(row)?;
    }
    for row in &data.lecturers {
        seeder.upsert(Collection::Lecturers, &row.key, Lecturer::fields(&row.name))?;
    }
    for row in &data.sections {
        let course_id = seeder.resolve(Collection::Courses, &row.course, &row.key)?;
        let lecturer_id = seeder.resolve(Collection::Lecturers, &row.lecturer, &row.key)?;
        seeder.upsert(Collection::Sections, &row.key, Section::fields(&course_id, &lecturer_id))?;
    }
    for row in &data.reviews {
        let section_id = seeder.resolve(Collection::Sections, &row.section, &row.key)?;
        seeder.upsert(
            Collection::Reviews,
            &row.key,
            Review::fields(&section_id, &row.body, row.rating),
        )?;
    }

    let report = seeder.report;
    tx.commit()?;

    info!(inserted = report.inserted, skipped = report.skipped, "seed complete");
    Ok(report)
}

struct Seeder<'a> {
    conn: &'a Connection,
    report: SeedReport,
    /// (collection, seed key) → store id
    ids: HashMap<(Collection, String), String>,
}

impl Seeder<'_> {
    fn course(&mut self, row: &CourseRow) -> Result<()> {
        let hash = idempotency_hash(Collection::Courses, &row.key);

        if find_id_by_hash(self.conn, &hash)?.is_none() {
            let taken = find_documents(
                self.conn,
                Collection::Courses,
                FIELD_COURSE_NUMBER,
                &row.course_number,
                Some(1),
            )?;
            if !taken.is_empty() {
                bail!(
                    "course number {} (key {}) already belongs to another course",
                    row.course_number,
                    row.key
                );
            }
        }

        self.upsert(
            Collection::Courses,
            &row.key,
            Course::fields(&row.course_number, &row.name),
        )
    }

    fn upsert(&mut self, collection: Collection, key: &str, fields: Map<String, Value>) -> Result<()> {
        let hash = idempotency_hash(collection, key);

        let id = match find_id_by_hash(self.conn, &hash)? {
            Some(existing) => {
                debug!(%collection, key, "already seeded");
                self.report.skipped += 1;
                existing
            }
            None => {
                let doc = Document::new(collection, fields);
                insert_document(self.conn, &doc, Some(&hash))
                    .with_context(|| format!("Failed to insert {} {}", collection, key))?;
                self.report.inserted += 1;
                doc.id
            }
        };

        if self.ids.insert((collection, key.to_string()), id).is_some() {
            bail!("duplicate {} key {}", collection, key);
        }
        Ok(())
    }

    fn resolve(&self, collection: Collection, key: &str, referenced_by: &str) -> Result<String> {
        self.ids
            .get(&(collection, key.to_string()))
            .cloned()
            .with_context(|| format!("{} references unknown {} key {}", referenced_by, collection, key))
    }
}
