use shared::{CreateWishResponse, WishViewResponse};

use crate::domain::commands::wishes::WishView;

pub struct WishMapper;

impl WishMapper {
    /// Viewer path for a published wish
    pub fn view_path(wish_id: &str) -> String {
        format!("/view/{}", wish_id)
    }

    pub fn to_create_response(wish_id: String) -> CreateWishResponse {
        CreateWishResponse {
            redirect: Self::view_path(&wish_id),
            wish_id,
        }
    }

    pub fn to_view_response(view: WishView) -> WishViewResponse {
        WishViewResponse {
            id: view.wish.id.clone(),
            wish: view.wish.to_document(),
            variant: view.variant,
            occasion_config: view.occasion_config.clone(),
            capsule: view.capsule,
        }
    }
}
