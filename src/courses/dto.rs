use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::error::FieldError;
use crate::validate::is_valid_url;

use super::repo::{Course, CourseFilter, CourseStatus, CourseWithAuthor, SortBy, SortOrder};

/// Request body for course creation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseRequest {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub duration: i32,
    pub status: Option<CourseStatus>,
}

impl CreateCourseRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if self.title.chars().count() < 3 {
            errors.push(FieldError::new("title", "must be at least 3 characters"));
        }
        if let Some(url) = &self.image_url {
            if !is_valid_url(url) {
                errors.push(FieldError::new("imageUrl", "must be a valid URL"));
            }
        }
        errors
    }
}

/// Request body for course update. Omitted fields are left unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub duration: Option<i32>,
    pub status: Option<CourseStatus>,
}

impl UpdateCourseRequest {
    pub fn validate(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        if let Some(title) = &self.title {
            if title.chars().count() < 3 {
                errors.push(FieldError::new("title", "must be at least 3 characters"));
            }
        }
        if let Some(url) = &self.image_url {
            if !is_valid_url(url) {
                errors.push(FieldError::new("imageUrl", "must be a valid URL"));
            }
        }
        errors
    }
}

fn default_page() -> i64 {
    1
}

fn default_limit() -> i64 {
    10
}

/// Query string for the public listing. Enumerated fields arrive as plain
/// strings and are checked in `parse` so that bad values produce per-field
/// validation errors instead of an opaque rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesQuery {
    pub title: Option<String>,
    pub status: Option<String>,
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Validated listing parameters.
#[derive(Debug)]
pub struct ListParams {
    pub filter: CourseFilter,
    pub page: i64,
    pub limit: i64,
    pub sort_by: SortBy,
    pub sort_order: SortOrder,
}

impl ListCoursesQuery {
    pub fn parse(self) -> Result<ListParams, Vec<FieldError>> {
        let mut errors = Vec::new();

        if self.page < 1 {
            errors.push(FieldError::new("page", "must be greater than or equal to 1"));
        }
        if !(1..=100).contains(&self.limit) {
            errors.push(FieldError::new("limit", "must be between 1 and 100"));
        }

        let status = match self.status.as_deref() {
            None => None,
            Some(s) => match s.parse::<CourseStatus>() {
                Ok(status) => Some(status),
                Err(()) => {
                    errors.push(FieldError::new("status", "must be one of ACTIVE, INACTIVE"));
                    None
                }
            },
        };

        let sort_by = match self.sort_by.as_deref() {
            None => SortBy::CreatedAt,
            Some(s) => s.parse::<SortBy>().unwrap_or_else(|()| {
                errors.push(FieldError::new(
                    "sortBy",
                    "must be one of title, createdAt, updatedAt, duration",
                ));
                SortBy::CreatedAt
            }),
        };

        let sort_order = match self.sort_order.as_deref() {
            None => SortOrder::Desc,
            Some(s) => s.parse::<SortOrder>().unwrap_or_else(|()| {
                errors.push(FieldError::new("sortOrder", "must be one of asc, desc"));
                SortOrder::Desc
            }),
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ListParams {
            filter: CourseFilter {
                title: self.title,
                status,
            },
            page: self.page,
            limit: self.limit,
            sort_by,
            sort_order,
        })
    }
}

/// Query string for the caller's own listing.
#[derive(Debug, Deserialize)]
pub struct MyCoursesQuery {
    pub title: Option<String>,
    pub status: Option<String>,
}

impl MyCoursesQuery {
    pub fn parse(self) -> Result<CourseFilter, Vec<FieldError>> {
        let status = match self.status.as_deref() {
            None => None,
            Some(s) => match s.parse::<CourseStatus>() {
                Ok(status) => Some(status),
                Err(()) => {
                    return Err(vec![FieldError::new(
                        "status",
                        "must be one of ACTIVE, INACTIVE",
                    )])
                }
            },
        };
        Ok(CourseFilter {
            title: self.title,
            status,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithAuthorDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
    pub duration: i32,
    pub status: CourseStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    pub author: AuthorDto,
}

impl From<CourseWithAuthor> for CourseWithAuthorDto {
    fn from(row: CourseWithAuthor) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            duration: row.duration,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
            author: AuthorDto {
                id: row.author_id,
                name: row.author_name,
                email: row.author_email,
            },
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub image_url: Option<String>,
    pub duration: i32,
    pub status: CourseStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl From<Course> for CourseDto {
    fn from(row: Course) -> Self {
        Self {
            id: row.id,
            title: row.title,
            slug: row.slug,
            description: row.description,
            image_url: row.image_url,
            duration: row.duration,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Pagination block returned next to public listings.
#[derive(Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl PaginationMeta {
    /// `limit` is validated to be >= 1 before this is called.
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let total_pages = (total + limit - 1) / limit;
        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CourseListResponse {
    pub courses: Vec<CourseWithAuthorDto>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Serialize)]
pub struct MyCoursesResponse {
    pub courses: Vec<CourseDto>,
}

/// Confirmation body for course creation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCourseResponse {
    pub message: &'static str,
    pub display_message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(page: i64, limit: i64) -> ListCoursesQuery {
        ListCoursesQuery {
            title: None,
            status: None,
            page,
            limit,
            sort_by: None,
            sort_order: None,
        }
    }

    #[test]
    fn pagination_first_of_three_pages() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn pagination_last_of_three_pages() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn pagination_exact_division() {
        let meta = PaginationMeta::new(2, 10, 20);
        assert_eq!(meta.total_pages, 2);
        assert!(!meta.has_next);
        assert!(meta.has_prev);
    }

    #[test]
    fn pagination_empty_result() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn list_query_defaults() {
        let params = query(1, 10).parse().expect("defaults are valid");
        assert_eq!(params.sort_by, SortBy::CreatedAt);
        assert_eq!(params.sort_order, SortOrder::Desc);
        assert!(params.filter.title.is_none());
        assert!(params.filter.status.is_none());
    }

    #[test]
    fn list_query_rejects_out_of_range_page_and_limit() {
        let errors = query(0, 10).parse().unwrap_err();
        assert_eq!(errors[0].field, "page");

        let errors = query(1, 0).parse().unwrap_err();
        assert_eq!(errors[0].field, "limit");

        let errors = query(1, 101).parse().unwrap_err();
        assert_eq!(errors[0].field, "limit");
    }

    #[test]
    fn list_query_rejects_unknown_enums() {
        let mut q = query(1, 10);
        q.status = Some("DRAFT".into());
        q.sort_by = Some("slug".into());
        q.sort_order = Some("down".into());
        let errors = q.parse().unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["status", "sortBy", "sortOrder"]);
    }

    #[test]
    fn list_query_parses_filters() {
        let mut q = query(2, 50);
        q.title = Some("rust".into());
        q.status = Some("INACTIVE".into());
        q.sort_by = Some("duration".into());
        q.sort_order = Some("asc".into());
        let params = q.parse().expect("valid query");
        assert_eq!(params.filter.title.as_deref(), Some("rust"));
        assert_eq!(params.filter.status, Some(CourseStatus::Inactive));
        assert_eq!(params.sort_by, SortBy::Duration);
        assert_eq!(params.sort_order, SortOrder::Asc);
    }

    #[test]
    fn create_request_requires_three_char_title() {
        let req = CreateCourseRequest {
            title: "Go".into(),
            description: "short".into(),
            image_url: None,
            duration: 60,
            status: None,
        };
        assert_eq!(req.validate()[0].field, "title");
    }

    #[test]
    fn create_request_rejects_malformed_image_url() {
        let req = CreateCourseRequest {
            title: "Intro to X".into(),
            description: "A course.".into(),
            image_url: Some("not a url".into()),
            duration: 60,
            status: None,
        };
        let errors = req.validate();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "imageUrl");
    }

    #[test]
    fn update_request_skips_absent_fields() {
        assert!(UpdateCourseRequest::default().validate().is_empty());

        let req = UpdateCourseRequest {
            title: Some("ab".into()),
            ..Default::default()
        };
        assert_eq!(req.validate()[0].field, "title");

        let req = UpdateCourseRequest {
            image_url: Some("nope".into()),
            ..Default::default()
        };
        assert_eq!(req.validate()[0].field, "imageUrl");
    }

    #[test]
    fn my_courses_query_rejects_unknown_status() {
        let q = MyCoursesQuery {
            title: None,
            status: Some("archived".into()),
        };
        assert_eq!(q.parse().unwrap_err()[0].field, "status");
    }
}
