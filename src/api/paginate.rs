use std::fmt;

use serde::{Deserialize, Serialize};

use super::{ApiError, ApiRequest, DataResponse, QueryParams};

/// A request for one page of results.
pub struct PaginatedRequest<'a, T> {
    /// The inner request.
    pub base: T,
    /// The zero-based page index.
    pub page: u32,
    /// The page size. The server default is used if unset.
    pub size: Option<u32>,
    /// Sort criteria in the format `property,(asc|desc)`.
    pub sort: &'a [String],
}

impl<T> fmt::Debug for PaginatedRequest<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaginatedRequest")
            .field("base", &self.base)
            .field("page", &self.page)
            .field("size", &self.size)
            .field("sort", &self.sort)
            .finish()
    }
}

impl<T: ApiRequest> ApiRequest for PaginatedRequest<'_, T> {
    type Response = T::Response;

    fn path(&self) -> String {
        self.base.path()
    }

    fn method(&self) -> http::Method {
        self.base.method()
    }

    fn body(&self) -> Option<impl Serialize> {
        self.base.body()
    }

    fn accept(&self) -> &'static str {
        self.base.accept()
    }

    fn query(&self) -> Option<QueryParams> {
        let paging = QueryParams::new()
            .param("page", self.page)
            .opt_param("size", self.size)
            .multi_param("sort", self.sort);

        Some(match self.base.query() {
            Some(q) => q.extend(paging),
            None => paging,
        })
    }
}

/// Page information for a [PagedModel].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    /// The requested page size.
    pub size: u64,
    /// The zero-based index of this page.
    pub number: u64,
    /// The total number of elements across all pages.
    pub total_elements: u64,
    /// The total number of pages.
    pub total_pages: u64,
}

/// One page of results.
///
/// Both the `{"content": [..], "page": {..}}` layout and the older layout
/// with the page fields inlined next to `content` are understood.
#[derive(Clone, Serialize)]
pub struct PagedModel<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// Page information, if the server sent any.
    pub page: Option<PageMetadata>,
}

impl<T> fmt::Debug for PagedModel<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PagedModel")
            .field("content", &self.content)
            .field("page", &self.page)
            .finish()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", bound(deserialize = "T: Deserialize<'de>"))]
struct RawPage<T> {
    #[serde(default)]
    content: Vec<T>,
    page: Option<PageMetadata>,
    number: Option<u64>,
    size: Option<u64>,
    total_elements: Option<u64>,
    total_pages: Option<u64>,
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for PagedModel<T> {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = RawPage::<T>::deserialize(d)?;
        let page = raw.page.or(
            match (raw.number, raw.size, raw.total_elements, raw.total_pages) {
                (Some(number), Some(size), Some(total_elements), Some(total_pages)) => {
                    Some(PageMetadata {
                        size,
                        number,
                        total_elements,
                        total_pages,
                    })
                }
                _ => None,
            },
        );

        Ok(PagedModel {
            content: raw.content,
            page,
        })
    }
}

impl<T> DataResponse for PagedModel<T> where T: for<'de> Deserialize<'de> {}

impl<T> PagedModel<T> {
    /// The index of the following page, or None if this is the last one.
    pub fn next_page(&self) -> Option<u32> {
        let meta = self.page?;
        if self.content.is_empty() || meta.number + 1 >= meta.total_pages {
            return None;
        }

        u32::try_from(meta.number + 1).ok()
    }
}

struct Paginator<F, E, R, T>
where
    F: Fn(PaginatedRequest<'_, R>) -> Result<R::Response, E>,
    E: From<ApiError>,
    R: ApiRequest<Response = PagedModel<T>> + Clone,
{
    base_req: R,
    fetch_page: F,
    batch: <Vec<T> as IntoIterator>::IntoIter,
    next_page: Option<u32>,
    size: Option<u32>,
    sort: Vec<String>,
    off: usize,
    limit: Option<usize>,
}

impl<F, E, R, T> Iterator for Paginator<F, E, R, T>
where
    F: Fn(PaginatedRequest<'_, R>) -> Result<R::Response, E>,
    E: From<ApiError>,
    R: ApiRequest<Response = PagedModel<T>> + Clone,
{
    type Item = Result<T, E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.limit.is_some_and(|l| self.off >= l) {
            return None;
        }

        if let Some(v) = self.batch.next() {
            self.off += 1;
            return Some(Ok(v));
        }

        let page = self.next_page.take()?;
        let page_req = self.base_req.clone().paginate(page, self.size, &self.sort);

        let resp = match (self.fetch_page)(page_req) {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };

        self.next_page = resp.next_page();
        self.batch = resp.content.into_iter();

        if let Some(v) = self.batch.next() {
            self.off += 1;
            Some(Ok(v))
        } else {
            None
        }
    }
}

/// Repeatedly make a request, fetching more pages by calling `fetch_page`
/// until the last page is reached or `limit` items have been returned.
pub fn paginate<F, E, R, T>(
    base_req: R,
    size: Option<u32>,
    sort: Vec<String>,
    limit: Option<usize>,
    fetch_page: F,
) -> Result<impl Iterator<Item = Result<T, E>>, E>
where
    F: Fn(PaginatedRequest<'_, R>) -> Result<R::Response, E>,
    E: From<ApiError>,
    R: ApiRequest<Response = PagedModel<T>> + Clone,
{
    let first = fetch_page(base_req.clone().paginate(0, size, &sort))?;

    Ok(Paginator {
        next_page: first.next_page(),
        batch: first.content.into_iter(),
        fetch_page,
        base_req,
        size,
        sort,
        off: 0,
        limit,
    })
}

#[cfg(test)]
mod test {
    use std::cell::RefCell;

    use super::*;
    use crate::api::test::{build, respond};

    #[derive(Debug, Clone)]
    struct GetNumbers;

    impl ApiRequest for GetNumbers {
        type Response = PagedModel<u32>;

        fn path(&self) -> String {
            "/api/numbers/page".to_string()
        }

        fn query(&self) -> Option<QueryParams> {
            Some(QueryParams::new().param("optFields", "none"))
        }
    }

    fn page_of(numbers: &[u32], number: u64, size: u64, total: u64) -> PagedModel<u32> {
        PagedModel {
            content: numbers.to_vec(),
            page: Some(PageMetadata {
                size,
                number,
                total_elements: total,
                total_pages: total.div_ceil(size),
            }),
        }
    }

    #[test]
    fn paginated_request_query() {
        let sort = vec!["id,desc".to_string()];
        let req = build(GetNumbers.paginate(3, Some(20), &sort));
        assert_eq!(
            req.uri().query(),
            Some("optFields=none&page=3&size=20&sort=id%2Cdesc")
        );
    }

    #[test]
    fn iterates_all_pages() -> anyhow::Result<()> {
        let seen = RefCell::new(Vec::new());
        let all = (0..7).collect::<Vec<u32>>();

        let items = paginate(GetNumbers, Some(3), vec![], None, |req| {
            seen.borrow_mut().push(req.page);
            let start = req.page as usize * 3;
            let end = (start + 3).min(all.len());
            Ok::<_, ApiError>(page_of(&all[start..end], req.page as u64, 3, 7))
        })?
        .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(items, all);
        assert_eq!(*seen.borrow(), vec![0, 1, 2]);
        Ok(())
    }

    #[test]
    fn stops_at_limit() -> anyhow::Result<()> {
        let seen = RefCell::new(Vec::new());
        let items = paginate(GetNumbers, Some(2), vec![], Some(3), |req| {
            seen.borrow_mut().push(req.page);
            let first = req.page * 2;
            Ok::<_, ApiError>(page_of(&[first, first + 1], req.page as u64, 2, 100))
        })?
        .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(items, vec![0, 1, 2]);
        assert_eq!(*seen.borrow(), vec![0, 1]);
        Ok(())
    }

    #[test]
    fn stops_without_page_metadata() -> anyhow::Result<()> {
        let items = paginate(GetNumbers, None, vec![], None, |_| {
            Ok::<_, ApiError>(PagedModel {
                content: vec![1, 2],
                page: None,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;

        assert_eq!(items, vec![1, 2]);
        Ok(())
    }

    #[test]
    fn parse_paged_model() {
        let body = r#"{
            "content": [1, 2],
            "page": {"size": 2, "number": 0, "totalElements": 5, "totalPages": 3}
        }"#;

        let page = respond::<PagedModel<u32>>(200, body).unwrap();
        assert_eq!(page.content, vec![1, 2]);
        assert_eq!(page.next_page(), Some(1));
    }

    #[test]
    fn parse_legacy_page() {
        let body = r#"{
            "totalElements": 5,
            "totalPages": 3,
            "first": false,
            "last": true,
            "size": 2,
            "content": [5],
            "number": 2,
            "numberOfElements": 1,
            "empty": false
        }"#;

        let page = respond::<PagedModel<u32>>(200, body).unwrap();
        assert_eq!(page.content, vec![5]);
        assert_eq!(page.page.map(|p| p.total_elements), Some(5));
        assert_eq!(page.next_page(), None);
    }
}
