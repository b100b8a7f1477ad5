use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct MessageDoc { pub message: String }

/// Items accept any additional fields; `name` and `description` are the
/// usual ones.
#[derive(ToSchema)]
pub struct ItemDoc {
    pub id: i64,
    /// The name of the item
    pub name: Option<String>,
    /// The description of the item
    pub description: Option<String>,
}

#[derive(ToSchema)]
pub struct ItemInputDoc {
    /// Omit or send null to have one assigned
    pub id: Option<i64>,
    /// The name of the item
    pub name: Option<String>,
    /// The description of the item
    pub description: Option<String>,
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Item Store API", description = "CRUD over items stored in a single JSON document"),
    paths(
        crate::routes::health,
        crate::routes::items::list,
        crate::routes::items::get,
        crate::routes::items::create,
        crate::routes::items::update,
        crate::routes::items::delete,
    ),
    components(
        schemas(
            HealthResponse,
            MessageDoc,
            ItemDoc,
            ItemInputDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "items")
    )
)]
pub struct ApiDoc;
