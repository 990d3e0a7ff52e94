//! Measurement id → display name lookup, built from the two catalogs.

use std::collections::HashMap;
use std::sync::Arc;

use crate::{AuthToken, SetgraphApi, SetgraphError};

#[derive(Clone, Copy, Debug)]
enum Catalog {
    Global,
    User,
}

impl Catalog {
    fn as_str(self) -> &'static str {
        match self {
            Catalog::Global => "global",
            Catalog::User => "user",
        }
    }
}

/// Fetch both measurement catalogs and merge them into one id → name map.
///
/// The global catalog is collected first, then the user-scoped one, so
/// user-scoped entries overwrite global ones on id collision.
pub async fn build_lookup(
    api: Arc<dyn SetgraphApi>,
    token: AuthToken,
) -> Result<HashMap<String, String>, SetgraphError> {
    let mut map = HashMap::new();
    collect_catalog(api.as_ref(), &token, Catalog::Global, &mut map).await?;
    collect_catalog(api.as_ref(), &token, Catalog::User, &mut map).await?;
    tracing::debug!(measurements = map.len(), "measurement lookup built");
    Ok(map)
}

/// Walk one catalog page by page, inserting display names into `map`.
///
/// A non-success status on page 0 fails the export; on any later page it
/// ends the catalog silently, the same as running out of data. Transport
/// errors always propagate.
async fn collect_catalog(
    api: &dyn SetgraphApi,
    token: &AuthToken,
    catalog: Catalog,
    map: &mut HashMap<String, String>,
) -> Result<(), SetgraphError> {
    let mut page = 0u32;
    loop {
        let result = match catalog {
            Catalog::Global => api.global_measurement_page(token, page).await,
            Catalog::User => api.user_measurement_page(token, page).await,
        };
        let page_data = match result {
            Ok(p) => p,
            Err(SetgraphError::Api {
                status: Some(status),
                ..
            }) if page > 0 => {
                tracing::debug!(
                    catalog = catalog.as_str(),
                    page,
                    status,
                    "catalog page returned a non-success status, treating as end of data"
                );
                break;
            }
            Err(err) => return Err(err),
        };

        if page_data.items.is_empty() {
            break;
        }
        for item in &page_data.items {
            map.insert(item.id.clone(), item.display_name().to_string());
        }
        if page_data.links.next.is_none() {
            break;
        }
        page += 1;
    }
    Ok(())
}
