//! Forward-only traversal of `{resources, next_url}` listings.

// crates.io
use serde::de::DeserializeOwned;
// self
use crate::{
	_prelude::*,
	gateway::Gateway,
	http::HttpTransport,
	obs::{self, CallKind},
};

/// One page of a paginated listing.
#[derive(Clone, Debug, Deserialize)]
pub struct PaginatedResources<R> {
	/// Items on this page.
	#[serde(default = "Vec::new")]
	pub resources: Vec<R>,
	/// Path of the next page; absent or empty on the last page.
	#[serde(default)]
	pub next_url: Option<String>,
}

impl<T> Gateway<T>
where
	T: HttpTransport,
{
	/// Walks every page starting at `base_url + path`.
	///
	/// `callback` receives each page's items in `next_url` order and returns whether to keep
	/// going. The next page is requested only after the callback returned `true`; the first
	/// error ends the walk.
	pub async fn list_pages<R, F>(
		&self,
		base_url: &str,
		access_token: &str,
		path: &str,
		mut callback: F,
	) -> Result<()>
	where
		R: DeserializeOwned,
		F: FnMut(Vec<R>) -> bool,
	{
		obs::observe_call(CallKind::Pagination, "list_pages", async move {
			let mut next = Some(path.to_owned());

			while let Some(path) = next.take().filter(|path| !path.is_empty()) {
				let page = self
					.fetch_json::<PaginatedResources<R>>(&format!("{base_url}{path}"), access_token)
					.await?;

				if !callback(page.resources) {
					break;
				}

				next = page.next_url;
			}

			Ok(())
		})
		.await
	}
}
