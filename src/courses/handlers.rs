use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::{
    auth::jwt::AuthUser,
    error::{is_unique_violation, AppError},
    state::AppState,
};

use super::dto::{
    CourseDto, CourseListResponse, CourseWithAuthorDto, CreateCourseRequest, CreateCourseResponse,
    ListCoursesQuery, MyCoursesQuery, MyCoursesResponse, PaginationMeta, UpdateCourseRequest,
};
use super::repo::{Course, CourseStatus};
use super::slug::slugify;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/courses", get(list_courses).post(create_course))
        .route(
            "/courses/:slug",
            get(get_course_by_slug)
                .put(update_course)
                .delete(delete_course),
        )
        .route("/me/courses", get(list_my_courses))
}

/// Mutations are permitted only to the owning user. Identity is already
/// established by `AuthUser`; a mismatch here is Forbidden, not Unauthorized.
fn ensure_owner(course: &Course, user_id: Uuid) -> Result<(), AppError> {
    if course.user_id != user_id {
        warn!(course_id = %course.id, user_id = %user_id, "mutation by non-owner rejected");
        return Err(AppError::forbidden("You are not the owner of this course."));
    }
    Ok(())
}

#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
    Query(query): Query<ListCoursesQuery>,
) -> Result<Json<CourseListResponse>, AppError> {
    let params = query.parse().map_err(AppError::Validation)?;

    let (rows, total) = Course::list_public(
        &state.db,
        &params.filter,
        params.page,
        params.limit,
        params.sort_by,
        params.sort_order,
    )
    .await?;

    Ok(Json(CourseListResponse {
        courses: rows.into_iter().map(CourseWithAuthorDto::from).collect(),
        pagination: PaginationMeta::new(params.page, params.limit, total),
    }))
}

#[instrument(skip(state))]
pub async fn get_course_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<Json<CourseWithAuthorDto>, AppError> {
    let course = Course::find_active_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::not_found("Course not found.", "Curso não encontrado."))?;

    Ok(Json(CourseWithAuthorDto::from(course)))
}

#[instrument(skip(state))]
pub async fn list_my_courses(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Query(query): Query<MyCoursesQuery>,
) -> Result<Json<MyCoursesResponse>, AppError> {
    let filter = query.parse().map_err(AppError::Validation)?;

    let courses = Course::list_by_owner(&state.db, user_id, &filter).await?;

    Ok(Json(MyCoursesResponse {
        courses: courses.into_iter().map(CourseDto::from).collect(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Json(payload): Json<CreateCourseRequest>,
) -> Result<(StatusCode, Json<CreateCourseResponse>), AppError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let slug = slugify(&payload.title);
    let status = payload.status.unwrap_or(CourseStatus::Active);

    let course = Course::create(
        &state.db,
        user_id,
        &payload.title,
        &slug,
        &payload.description,
        payload.image_url.as_deref(),
        payload.duration,
        status,
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            warn!(slug = %slug, "slug already taken");
            AppError::bad_request(
                "Course with same title already exists.",
                "Curso com este título já existe.",
            )
        } else {
            AppError::Database(e)
        }
    })?;

    info!(course_id = %course.id, slug = %course.slug, user_id = %user_id, "course created");
    Ok((
        StatusCode::CREATED,
        Json(CreateCourseResponse {
            message: "Course created successfully.",
            display_message: "Curso criado com sucesso.",
        }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
    Json(payload): Json<UpdateCourseRequest>,
) -> Result<StatusCode, AppError> {
    let errors = payload.validate();
    if !errors.is_empty() {
        return Err(AppError::Validation(errors));
    }

    let course = Course::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::bad_request("Course not found.", "Curso não encontrado."))?;

    ensure_owner(&course, user_id)?;

    Course::update(
        &state.db,
        course.id,
        payload.title.as_deref(),
        payload.description.as_deref(),
        payload.image_url.as_deref(),
        payload.duration,
        payload.status,
    )
    .await?;

    info!(course_id = %course.id, user_id = %user_id, "course updated");
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    let course = Course::find_by_slug(&state.db, &slug)
        .await?
        .ok_or_else(|| AppError::bad_request("Course not found.", "Curso não encontrado."))?;

    ensure_owner(&course, user_id)?;

    Course::delete(&state.db, course.id).await?;

    info!(course_id = %course.id, user_id = %user_id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn course_owned_by(owner: Uuid) -> Course {
        Course {
            id: Uuid::new_v4(),
            title: "Intro to X".into(),
            slug: "intro-to-x".into(),
            description: "A course.".into(),
            image_url: None,
            duration: 60,
            status: CourseStatus::Active,
            user_id: owner,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        }
    }

    #[test]
    fn owner_passes_ownership_check() {
        let owner = Uuid::new_v4();
        assert!(ensure_owner(&course_owned_by(owner), owner).is_ok());
    }

    #[test]
    fn non_owner_is_forbidden_regardless_of_course_state() {
        let course = course_owned_by(Uuid::new_v4());
        let err = ensure_owner(&course, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));

        let mut inactive = course_owned_by(Uuid::new_v4());
        inactive.status = CourseStatus::Inactive;
        let err = ensure_owner(&inactive, Uuid::new_v4()).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }
}
