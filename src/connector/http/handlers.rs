use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;

use super::dto::{
    CreatePullRequestRequest, CreateTeamRequest, HealthResponse, MergePullRequestRequest,
    PullRequestEnvelope, PullRequestResponse, ReassignRequest, ReassignResponse,
    ReviewerStatsResponse, SetIsActiveRequest, TeamEnvelope, TeamQuery, TeamResponse,
    UserEnvelope, UserQuery, UserResponse, UserReviewsResponse,
};
use super::error::ApiError;
use crate::connector::api::Container;

type AppState = State<Arc<Container>>;

pub async fn add_team(
    State(container): AppState,
    payload: Result<Json<CreateTeamRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TeamEnvelope>), ApiError> {
    let Json(request) = payload?;
    let (team, members) = container
        .team_service()
        .create_team(&request.team_name, request.members)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(TeamEnvelope {
            team: TeamResponse::new(&team, &members),
        }),
    ))
}

pub async fn get_team(
    State(container): AppState,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<TeamResponse>, ApiError> {
    let Query(query) = query?;
    let (team, members) = container.team_service().get_team(&query.team_name).await?;
    Ok(Json(TeamResponse::new(&team, &members)))
}

pub async fn set_is_active(
    State(container): AppState,
    payload: Result<Json<SetIsActiveRequest>, JsonRejection>,
) -> Result<Json<UserEnvelope>, ApiError> {
    let Json(request) = payload?;
    let user = container
        .user_service()
        .set_active(&request.user_id, request.is_active)
        .await?;

    Ok(Json(UserEnvelope {
        user: UserResponse::from(&user),
    }))
}

pub async fn get_reviews(
    State(container): AppState,
    query: Result<Query<UserQuery>, QueryRejection>,
) -> Result<Json<UserReviewsResponse>, ApiError> {
    let Query(query) = query?;
    let pull_requests = container.user_service().get_reviews(&query.user_id).await?;
    Ok(Json(UserReviewsResponse::new(&query.user_id, &pull_requests)))
}

pub async fn create_pull_request(
    State(container): AppState,
    payload: Result<Json<CreatePullRequestRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PullRequestEnvelope>), ApiError> {
    let Json(request) = payload?;
    let pr = container
        .pull_request_service()
        .create(
            &request.pull_request_id,
            &request.pull_request_name,
            &request.author_id,
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PullRequestEnvelope {
            pr: PullRequestResponse::from(&pr),
        }),
    ))
}

pub async fn merge_pull_request(
    State(container): AppState,
    payload: Result<Json<MergePullRequestRequest>, JsonRejection>,
) -> Result<Json<PullRequestEnvelope>, ApiError> {
    let Json(request) = payload?;
    let pr = container
        .pull_request_service()
        .merge(&request.pull_request_id)
        .await?;

    Ok(Json(PullRequestEnvelope {
        pr: PullRequestResponse::from(&pr),
    }))
}

pub async fn reassign_reviewer(
    State(container): AppState,
    payload: Result<Json<ReassignRequest>, JsonRejection>,
) -> Result<Json<ReassignResponse>, ApiError> {
    let Json(request) = payload?;
    let (pr, replaced_by) = container
        .pull_request_service()
        .reassign(&request.pull_request_id, &request.old_user_id)
        .await?;

    Ok(Json(ReassignResponse {
        pr: PullRequestResponse::from(&pr),
        replaced_by,
    }))
}

pub async fn reviewer_stats(
    State(container): AppState,
    query: Result<Query<TeamQuery>, QueryRejection>,
) -> Result<Json<ReviewerStatsResponse>, ApiError> {
    let Query(query) = query?;
    let items = container
        .stats_service()
        .reviewer_stats(&query.team_name)
        .await?;
    Ok(Json(ReviewerStatsResponse { items }))
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}
