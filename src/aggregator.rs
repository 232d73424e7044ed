// 📊 Course Aggregator - course + sections + lecturers + reviews + rollups
//
// One request is a single fan-out/fan-in:
//
//   course (by number)
//     └─ sections (by courseId)          ─┐
//          ├─ lecturer (by id)            │ per section, concurrently
//          └─ reviews (by sectionId)     ─┘
//   fold every section's ReviewTally into the course tally
//
// Averages come from (sum, count) tallies. The course average is the global
// sum over the global count, never the mean of section means. A zero count
// means the statistics fields are absent, never 0 or NaN.

use crate::entities::course::FIELD_COURSE_NUMBER;
use crate::entities::review::FIELD_SECTION_ID;
use crate::entities::section::FIELD_COURSE_ID;
use crate::entities::{Course, Lecturer, Review, Section, RATING_RANGE};
use crate::error::{AggregateError, StoreResult};
use crate::store::{Collection, DataStore};
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::iter::Sum;
use std::ops::Add;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Hosted-function default; the whole aggregation must finish inside it
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

// ============================================================================
// REVIEW TALLY
// ============================================================================

/// Running (sum, count) of ratings. Addition is associative and commutative,
/// so section tallies can be computed independently and folded in any order.
///
/// `sum` is i128 so any number of stored i64 ratings folds without overflow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReviewTally {
    pub sum: i128,
    pub count: usize,
}

impl ReviewTally {
    pub fn record(&mut self, rating: i64) {
        self.sum += i128::from(rating);
        self.count += 1;
    }

    /// Review count, or `None` when there are no reviews
    pub fn number_of_reviews(&self) -> Option<usize> {
        (self.count > 0).then_some(self.count)
    }

    /// Mean rating, or `None` when there are no reviews
    pub fn average(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum as f64 / self.count as f64)
    }
}

impl Add for ReviewTally {
    type Output = ReviewTally;

    fn add(self, other: ReviewTally) -> ReviewTally {
        ReviewTally {
            sum: self.sum + other.sum,
            count: self.count + other.count,
        }
    }
}

impl Sum for ReviewTally {
    fn sum<I: Iterator<Item = ReviewTally>>(iter: I) -> Self {
        iter.fold(ReviewTally::default(), Add::add)
    }
}

// ============================================================================
// RESULT TREE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDetail {
    pub review_id: String,
    pub body: String,
    pub rating: i64,
}

impl From<Review> for ReviewDetail {
    fn from(review: Review) -> Self {
        ReviewDetail {
            review_id: review.id,
            body: review.body,
            rating: review.rating,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionDetail {
    pub course_id: String,
    pub lecturer_id: String,
    pub lecturer_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,

    pub reviews: Vec<ReviewDetail>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDetail {
    pub course_number: String,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_reviews: Option<usize>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,

    pub sections: Vec<SectionDetail>,
}

// ============================================================================
// AGGREGATOR
// ============================================================================

pub struct CourseAggregator {
    store: Arc<dyn DataStore>,
    timeout: Duration,
}

impl CourseAggregator {
    pub fn new(store: Arc<dyn DataStore>) -> Self {
        CourseAggregator {
            store,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Course, its sections with lecturer names and reviews, and rating
    /// rollups at section and course level.
    ///
    /// Fails as a whole: no partial tree is ever returned.
    pub async fn get_course_detail(&self, course_number: &str) -> Result<CourseDetail, AggregateError> {
        match tokio::time::timeout(self.timeout, self.aggregate(course_number)).await {
            Ok(result) => result,
            Err(_) => Err(AggregateError::Timeout(self.timeout)),
        }
    }

    async fn aggregate(&self, course_number: &str) -> Result<CourseDetail, AggregateError> {
        let course = self.find_course(course_number).await?;

        let section_docs = self
            .store
            .find_all_by_field(Section::COLLECTION, FIELD_COURSE_ID, &course.id)
            .await?;
        let sections = section_docs
            .iter()
            .map(Section::from_document)
            .collect::<StoreResult<Vec<_>>>()?;

        // try_join_all keeps input order, so output matches a sequential walk
        let built = try_join_all(sections.iter().map(|section| self.build_section(section))).await?;

        let course_tally: ReviewTally = built.iter().map(|(_, tally)| *tally).sum();
        let sections: Vec<SectionDetail> = built.into_iter().map(|(detail, _)| detail).collect();

        info!(
            course_number = %course.course_number,
            sections = sections.len(),
            reviews = course_tally.count,
            "aggregated course detail"
        );

        Ok(CourseDetail {
            course_number: course.course_number,
            name: course.name,
            number_of_reviews: course_tally.number_of_reviews(),
            average_rating: course_tally.average(),
            sections,
        })
    }

    async fn find_course(&self, course_number: &str) -> Result<Course, AggregateError> {
        let matches = self
            .store
            .find_all_by_field(Course::COLLECTION, FIELD_COURSE_NUMBER, course_number)
            .await?;

        if matches.len() > 1 {
            warn!(
                course_number,
                matches = matches.len(),
                "course number is not unique, using the first match"
            );
        }

        match matches.first() {
            Some(doc) => Ok(Course::from_document(doc)?),
            None => Err(AggregateError::NotFound(course_number.to_string())),
        }
    }

    async fn build_section(
        &self,
        section: &Section,
    ) -> Result<(SectionDetail, ReviewTally), AggregateError> {
        let (lecturer_doc, review_docs) = futures::try_join!(
            self.store.get_by_id(Lecturer::COLLECTION, &section.lecturer_id),
            self.store
                .find_all_by_field(Review::COLLECTION, FIELD_SECTION_ID, &section.id),
        )?;

        let lecturer_doc = lecturer_doc.ok_or_else(|| AggregateError::DanglingReference {
            section_id: section.id.clone(),
            lecturer_id: section.lecturer_id.clone(),
        })?;
        let lecturer = Lecturer::from_document(&lecturer_doc)?;

        let mut tally = ReviewTally::default();
        let mut reviews = Vec::with_capacity(review_docs.len());

        for doc in &review_docs {
            let review = Review::from_document(doc)?;
            if !review.has_valid_rating() {
                warn!(
                    review_id = %review.id,
                    rating = review.rating,
                    "rating outside {}..={}",
                    RATING_RANGE.start(),
                    RATING_RANGE.end()
                );
            }
            tally.record(review.rating);
            reviews.push(ReviewDetail::from(review));
        }

        debug!(
            section_id = %section.id,
            lecturer = %lecturer.name,
            reviews = tally.count,
            "section built"
        );

        let detail = SectionDetail {
            course_id: section.course_id.clone(),
            lecturer_id: section.lecturer_id.clone(),
            lecturer_name: lecturer.name,
            number_of_reviews: tally.number_of_reviews(),
            average_rating: tally.average(),
            reviews,
        };

        Ok((detail, tally))
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StoreError;
    use crate::store::{Document, MemoryStore};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Mutex;

    // ------------------------------------------------------------------------
    // Fixtures
    // ------------------------------------------------------------------------

    fn course(store: &MemoryStore, number: &str, name: &str) -> String {
        store
            .insert(Collection::Courses, json!({"courseNumber": number, "name": name}))
            .unwrap()
    }

    fn lecturer(store: &MemoryStore, name: &str) -> String {
        store.insert(Collection::Lecturers, json!({"name": name})).unwrap()
    }

    fn section(store: &MemoryStore, course_id: &str, lecturer_id: &str) -> String {
        store
            .insert(
                Collection::Sections,
                json!({"courseId": course_id, "lecturerId": lecturer_id}),
            )
            .unwrap()
    }

    fn review(store: &MemoryStore, section_id: &str, body: &str, rating: i64) -> String {
        store
            .insert(
                Collection::Reviews,
                json!({"sectionId": section_id, "body": body, "rating": rating}),
            )
            .unwrap()
    }

    /// KIEI-451: Brian Eng (5 "Great!", 3 "OK"), Ben Block (no reviews)
    fn kiei_451() -> MemoryStore {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro to Software Development");
        let brian = lecturer(&store, "Brian Eng");
        let ben = lecturer(&store, "Ben Block");

        let brian_section = section(&store, &course_id, &brian);
        section(&store, &course_id, &ben);

        review(&store, &brian_section, "Great!", 5);
        review(&store, &brian_section, "OK", 3);
        store
    }

    fn aggregator(store: MemoryStore) -> CourseAggregator {
        CourseAggregator::new(Arc::new(store))
    }

    /// Records every lookup so tests can assert which collections were touched
    struct RecordingStore {
        inner: MemoryStore,
        calls: Mutex<Vec<Collection>>,
    }

    impl RecordingStore {
        fn new(inner: MemoryStore) -> Self {
            RecordingStore {
                inner,
                calls: Mutex::new(Vec::new()),
            }
        }

        fn record(&self, collection: Collection) {
            self.calls.lock().unwrap().push(collection);
        }

        fn calls(&self) -> Vec<Collection> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DataStore for RecordingStore {
        async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
            self.record(collection);
            self.inner.get_by_id(collection, id).await
        }

        async fn find_all_by_field(
            &self,
            collection: Collection,
            field: &str,
            value: &str,
        ) -> StoreResult<Vec<Document>> {
            self.record(collection);
            self.inner.find_all_by_field(collection, field, value).await
        }
    }

    /// Fails every lookup against one collection
    struct FailingStore {
        inner: MemoryStore,
        broken: Collection,
    }

    #[async_trait]
    impl DataStore for FailingStore {
        async fn get_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Document>> {
            if collection == self.broken {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            self.inner.get_by_id(collection, id).await
        }

        async fn find_all_by_field(
            &self,
            collection: Collection,
            field: &str,
            value: &str,
        ) -> StoreResult<Vec<Document>> {
            if collection == self.broken {
                return Err(StoreError::Unavailable("connection reset".to_string()));
            }
            self.inner.find_all_by_field(collection, field, value).await
        }
    }

    /// Never answers in time
    struct StalledStore;

    #[async_trait]
    impl DataStore for StalledStore {
        async fn get_by_id(&self, _collection: Collection, _id: &str) -> StoreResult<Option<Document>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(None)
        }

        async fn find_all_by_field(
            &self,
            _collection: Collection,
            _field: &str,
            _value: &str,
        ) -> StoreResult<Vec<Document>> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(Vec::new())
        }
    }

    // ------------------------------------------------------------------------
    // ReviewTally
    // ------------------------------------------------------------------------

    fn tally_of(ratings: &[i64]) -> ReviewTally {
        let mut tally = ReviewTally::default();
        for rating in ratings {
            tally.record(*rating);
        }
        tally
    }

    #[test]
    fn test_tally_average() {
        let tally = tally_of(&[3, 5]);
        assert_eq!(tally, ReviewTally { sum: 8, count: 2 });
        assert_eq!(tally.average(), Some(4.0));
        assert_eq!(tally.number_of_reviews(), Some(2));
    }

    #[test]
    fn test_empty_tally_has_no_statistics() {
        let tally = ReviewTally::default();
        assert_eq!(tally.average(), None);
        assert_eq!(tally.number_of_reviews(), None);
    }

    #[test]
    fn test_tally_fold_is_order_independent() {
        let parts = vec![
            tally_of(&[1]),
            tally_of(&[5, 5, 5]),
            ReviewTally::default(),
        ];

        let forward: ReviewTally = parts.iter().copied().sum();
        let backward: ReviewTally = parts.iter().rev().copied().sum();

        assert_eq!(forward, backward);
        assert_eq!(forward, ReviewTally { sum: 16, count: 4 });
    }

    // ------------------------------------------------------------------------
    // Aggregation
    // ------------------------------------------------------------------------

    #[tokio::test]
    async fn test_kiei_451_scenario() {
        let detail = aggregator(kiei_451())
            .get_course_detail("KIEI-451")
            .await
            .unwrap();

        assert_eq!(detail.course_number, "KIEI-451");
        assert_eq!(detail.name, "Intro to Software Development");
        assert_eq!(detail.number_of_reviews, Some(2));
        assert_eq!(detail.average_rating, Some(4.0));
        assert_eq!(detail.sections.len(), 2);

        let brian = &detail.sections[0];
        assert_eq!(brian.lecturer_name, "Brian Eng");
        assert_eq!(brian.number_of_reviews, Some(2));
        assert_eq!(brian.average_rating, Some(4.0));
        let bodies: Vec<&str> = brian.reviews.iter().map(|r| r.body.as_str()).collect();
        assert_eq!(bodies, vec!["Great!", "OK"]);

        let ben = &detail.sections[1];
        assert_eq!(ben.lecturer_name, "Ben Block");
        assert_eq!(ben.number_of_reviews, None);
        assert_eq!(ben.average_rating, None);
        assert!(ben.reviews.is_empty());
    }

    #[tokio::test]
    async fn test_kiei_451_json_shape() {
        let detail = aggregator(kiei_451())
            .get_course_detail("KIEI-451")
            .await
            .unwrap();
        let value = serde_json::to_value(&detail).unwrap();

        assert_eq!(value["courseNumber"], "KIEI-451");
        assert_eq!(value["numberOfReviews"], 2);
        assert_eq!(value["averageRating"], 4.0);

        let brian = &value["sections"][0];
        assert_eq!(brian["lecturerName"], "Brian Eng");
        assert_eq!(brian["reviews"][0]["rating"], 5);
        assert!(brian["reviews"][0]["reviewId"].is_string());

        let ben = value["sections"][1].as_object().unwrap();
        assert!(!ben.contains_key("numberOfReviews"));
        assert!(!ben.contains_key("averageRating"));
        assert_eq!(ben["reviews"], json!([]));
        assert!(ben["courseId"].is_string());
        assert!(ben["lecturerId"].is_string());
    }

    #[tokio::test]
    async fn test_two_sections_three_reviews() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-925", "Software Development II");
        let a = section(&store, &course_id, &lecturer(&store, "A"));
        let b = section(&store, &course_id, &lecturer(&store, "B"));
        review(&store, &a, "x", 3);
        review(&store, &a, "y", 5);
        review(&store, &b, "z", 4);

        let detail = aggregator(store).get_course_detail("KIEI-925").await.unwrap();

        assert_eq!(detail.sections[0].number_of_reviews, Some(2));
        assert_eq!(detail.sections[0].average_rating, Some(4.0));
        assert_eq!(detail.sections[1].number_of_reviews, Some(1));
        assert_eq!(detail.sections[1].average_rating, Some(4.0));
        assert_eq!(detail.number_of_reviews, Some(3));
        assert_eq!(detail.average_rating, Some(4.0));
    }

    #[tokio::test]
    async fn test_course_average_is_not_mean_of_section_means() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        let a = section(&store, &course_id, &lecturer(&store, "A"));
        let b = section(&store, &course_id, &lecturer(&store, "B"));
        review(&store, &a, "bad", 1);
        for _ in 0..3 {
            review(&store, &b, "good", 5);
        }

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();

        // mean of means would be 3.0
        assert_eq!(detail.number_of_reviews, Some(4));
        let average = detail.average_rating.unwrap();
        assert!((average - 4.0).abs() < 1e-9, "got {}", average);
    }

    #[tokio::test]
    async fn test_course_with_only_empty_sections_has_no_statistics() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        section(&store, &course_id, &lecturer(&store, "A"));
        section(&store, &course_id, &lecturer(&store, "B"));

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();
        assert_eq!(detail.sections.len(), 2);
        assert_eq!(detail.number_of_reviews, None);
        assert_eq!(detail.average_rating, None);

        let value = serde_json::to_value(&detail).unwrap();
        let object = value.as_object().unwrap();
        assert!(!object.contains_key("numberOfReviews"));
        assert!(!object.contains_key("averageRating"));
    }

    #[tokio::test]
    async fn test_course_without_sections() {
        let store = MemoryStore::new();
        course(&store, "KIEI-999", "Nobody teaches this");

        let detail = aggregator(store).get_course_detail("KIEI-999").await.unwrap();
        assert!(detail.sections.is_empty());
        assert_eq!(detail.average_rating, None);
        assert_eq!(detail.number_of_reviews, None);
    }

    #[tokio::test]
    async fn test_unknown_course_stops_after_course_lookup() {
        let store = Arc::new(RecordingStore::new(kiei_451()));
        let aggregator = CourseAggregator::new(store.clone());

        let err = aggregator.get_course_detail("KIEI-000").await.unwrap_err();

        assert!(matches!(err, AggregateError::NotFound(ref n) if n == "KIEI-000"));
        assert_eq!(store.calls(), vec![Collection::Courses]);
    }

    #[tokio::test]
    async fn test_lookups_per_section() {
        let store = Arc::new(RecordingStore::new(kiei_451()));
        let aggregator = CourseAggregator::new(store.clone());

        aggregator.get_course_detail("KIEI-451").await.unwrap();

        let calls = store.calls();
        assert_eq!(calls.len(), 6);
        assert_eq!(calls[0], Collection::Courses);
        assert_eq!(calls[1], Collection::Sections);
        assert_eq!(calls.iter().filter(|c| **c == Collection::Lecturers).count(), 2);
        assert_eq!(calls.iter().filter(|c| **c == Collection::Reviews).count(), 2);
    }

    #[tokio::test]
    async fn test_dangling_lecturer_fails_whole_request() {
        let store = kiei_451();
        let course_id = store
            .find_one_by_field(Collection::Courses, "courseNumber", "KIEI-451")
            .await
            .unwrap()
            .unwrap()
            .id;
        let ghost_section = section(&store, &course_id, "no-such-lecturer");

        let err = aggregator(store).get_course_detail("KIEI-451").await.unwrap_err();

        match err {
            AggregateError::DanglingReference {
                section_id,
                lecturer_id,
            } => {
                assert_eq!(section_id, ghost_section);
                assert_eq!(lecturer_id, "no-such-lecturer");
            }
            other => panic!("expected dangling reference, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_store_failure_mid_fold_returns_no_partial_result() {
        let store = FailingStore {
            inner: kiei_451(),
            broken: Collection::Reviews,
        };
        let aggregator = CourseAggregator::new(Arc::new(store));

        let err = aggregator.get_course_detail("KIEI-451").await.unwrap_err();
        assert!(matches!(err, AggregateError::StoreUnavailable(_)));
    }

    #[tokio::test]
    async fn test_deadline_exceeded_is_timeout() {
        let aggregator =
            CourseAggregator::new(Arc::new(StalledStore)).with_timeout(Duration::from_millis(20));

        let err = aggregator.get_course_detail("KIEI-451").await.unwrap_err();
        assert!(matches!(err, AggregateError::Timeout(d) if d == Duration::from_millis(20)));
    }

    #[tokio::test]
    async fn test_malformed_review_fails_request() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        let s = section(&store, &course_id, &lecturer(&store, "A"));
        review(&store, &s, "fine", 4);
        store
            .insert(
                Collection::Reviews,
                json!({"sectionId": s, "body": "five stars", "rating": "5"}),
            )
            .unwrap();

        let err = aggregator(store).get_course_detail("KIEI-451").await.unwrap_err();
        assert!(matches!(
            err,
            AggregateError::MalformedDocument { ref collection, ref field, .. }
                if collection == "reviews" && field == "rating"
        ));
    }

    #[tokio::test]
    async fn test_out_of_range_rating_is_counted() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        let s = section(&store, &course_id, &lecturer(&store, "A"));
        review(&store, &s, "typo", 50);
        review(&store, &s, "fine", 4);

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();
        assert_eq!(detail.number_of_reviews, Some(2));
        assert_eq!(detail.average_rating, Some(27.0));
    }

    #[test]
    fn test_tally_does_not_overflow_on_extreme_ratings() {
        let tally = tally_of(&[i64::MAX, i64::MAX, 4]);
        assert_eq!(tally.count, 3);
        assert_eq!(tally.sum, 2 * i128::from(i64::MAX) + 4);

        let folded: ReviewTally = [tally, tally_of(&[i64::MIN])].into_iter().sum();
        assert_eq!(folded.sum, i128::from(i64::MAX) + 4 - 1);
    }

    #[tokio::test]
    async fn test_extreme_rating_is_counted_without_panicking() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        let s = section(&store, &course_id, &lecturer(&store, "A"));
        review(&store, &s, "corrupt", i64::MAX);
        review(&store, &s, "fine", 4);

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();
        assert_eq!(detail.number_of_reviews, Some(2));

        let expected = (i128::from(i64::MAX) + 4) as f64 / 2.0;
        assert_eq!(detail.average_rating, Some(expected));
        assert_eq!(detail.sections[0].average_rating, Some(expected));
    }

    #[tokio::test]
    async fn test_duplicate_course_number_uses_first_match() {
        let store = MemoryStore::new();
        let first = course(&store, "KIEI-451", "First");
        course(&store, "KIEI-451", "Second");
        section(&store, &first, &lecturer(&store, "Brian Eng"));

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();
        assert_eq!(detail.name, "First");
        assert_eq!(detail.sections.len(), 1);
    }

    #[tokio::test]
    async fn test_same_lecturer_twice_gives_two_sections_in_store_order() {
        let store = MemoryStore::new();
        let course_id = course(&store, "KIEI-451", "Intro");
        let brian = lecturer(&store, "Brian Eng");
        let ben = lecturer(&store, "Ben Block");
        section(&store, &course_id, &ben);
        section(&store, &course_id, &brian);
        section(&store, &course_id, &ben);

        let detail = aggregator(store).get_course_detail("KIEI-451").await.unwrap();
        let names: Vec<&str> = detail
            .sections
            .iter()
            .map(|s| s.lecturer_name.as_str())
            .collect();
        assert_eq!(names, vec!["Ben Block", "Brian Eng", "Ben Block"]);
    }

    #[tokio::test]
    async fn test_repeated_request_is_byte_identical() {
        let aggregator = aggregator(kiei_451());

        let first = serde_json::to_string(&aggregator.get_course_detail("KIEI-451").await.unwrap()).unwrap();
        let second = serde_json::to_string(&aggregator.get_course_detail("KIEI-451").await.unwrap()).unwrap();

        assert_eq!(first, second);
        let parsed: Value = serde_json::from_str(&first).unwrap();
        assert_eq!(parsed["sections"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_detail_round_trips_through_json() {
        let detail = aggregator(kiei_451())
            .get_course_detail("KIEI-451")
            .await
            .unwrap();

        let json = serde_json::to_string(&detail).unwrap();
        let back: CourseDetail = serde_json::from_str(&json).unwrap();
        assert_eq!(back, detail);
    }
}
