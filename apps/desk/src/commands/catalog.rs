//! # Catalog Commands
//!
//! Menu for the order entry screen and the raw-JSON editor in the manager
//! view. Edits apply to orders placed afterwards; placed orders keep the
//! prices they were taken at.

use tracing::debug;

use crate::error::ApiError;
use crate::state::AppContext;
use fireside_core::Catalog;

/// Current menu, read from disk.
pub async fn get_menu(ctx: &AppContext) -> Result<Catalog, ApiError> {
    Ok(ctx.catalog.load().await?)
}

/// Catalog file contents for the editor.
pub async fn catalog_text(ctx: &AppContext) -> Result<String, ApiError> {
    Ok(ctx.catalog.raw_text().await?)
}

/// Validates and saves edited catalog JSON, returning the parsed menu.
///
/// Invalid text is a `VALIDATION_ERROR` and leaves the file unchanged.
pub async fn save_catalog_text(ctx: &AppContext, text: String) -> Result<Catalog, ApiError> {
    debug!(bytes = text.len(), "save_catalog_text command");
    Ok(ctx.catalog.save_text(&text).await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::cart::{add_to_cart, AddToCart};
    use crate::error::ErrorCode;
    use crate::state::{testing, SessionContext};
    use fireside_core::Money;

    #[tokio::test]
    async fn test_reprice_applies_to_new_lines_only() {
        let (ctx, _, _dir) = testing::context().await;
        let mut session = SessionContext::default();
        let soda = || AddToCart {
            item_id: "dr_soda".into(),
            qty: 1,
            ..AddToCart::default()
        };

        add_to_cart(&ctx, &mut session, soda()).await.unwrap();

        let text = catalog_text(&ctx).await.unwrap();
        let edited = text.replacen("\"base_price\": 2.5", "\"base_price\": 3.0", 1);
        assert_ne!(text, edited);
        save_catalog_text(&ctx, edited).await.unwrap();

        let summary = add_to_cart(&ctx, &mut session, soda()).await.unwrap();
        assert_eq!(summary.lines[0].line_total, Money::from_cents(250));
        assert_eq!(summary.lines[1].line_total, Money::from_cents(300));
    }

    #[tokio::test]
    async fn test_invalid_edit_is_rejected() {
        let (ctx, _, _dir) = testing::context().await;
        let before = catalog_text(&ctx).await.unwrap();

        let err = save_catalog_text(&ctx, "{ not json".into()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(catalog_text(&ctx).await.unwrap(), before);
        assert!(get_menu(&ctx).await.unwrap().item_count() > 0);
    }
}
