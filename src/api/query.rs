use std::fmt::Display;

/// Query string parameters, in insertion order.
///
/// Keys may repeat: list-valued parameters such as `optFields` or `sort` are
/// sent once per value (`optFields=tags&optFields=msData`), which is what the
/// server expects.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct QueryParams(Vec<(&'static str, String)>);

impl QueryParams {
    /// An empty set of parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single parameter.
    pub fn param(mut self, key: &'static str, value: impl Display) -> Self {
        self.0.push((key, value.to_string()));
        self
    }

    /// Add a parameter if it is set.
    pub fn opt_param(self, key: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Add one parameter per value.
    pub fn multi_param<V: Display>(
        mut self,
        key: &'static str,
        values: impl IntoIterator<Item = V>,
    ) -> Self {
        self.0
            .extend(values.into_iter().map(|v| (key, v.to_string())));
        self
    }

    /// Add an optional-field selection. `None` leaves the server defaults in
    /// place, and an empty selection sends `none` to turn them off.
    pub fn opt_fields<F: Display>(self, key: &'static str, fields: Option<&[F]>) -> Self {
        match fields {
            None => self,
            Some([]) => self.param(key, "none"),
            Some(fields) => self.multi_param(key, fields),
        }
    }

    /// Append all parameters from `other`.
    pub fn extend(mut self, other: QueryParams) -> Self {
        self.0.extend(other.0);
        self
    }

    /// Returns true if no parameters are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The first value for `key`, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.get_all(key).next()
    }

    /// All values for `key`, in order.
    pub fn get_all<'a, 'k>(&'a self, key: &'k str) -> impl Iterator<Item = &'a str> + use<'a, 'k> {
        self.0
            .iter()
            .filter(move |(k, _)| *k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Encode as `application/x-www-form-urlencoded`.
    pub fn encode(&self) -> String {
        let mut ser = url::form_urlencoded::Serializer::new(String::new());
        for (k, v) in &self.0 {
            ser.append_pair(k, v);
        }

        ser.finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn repeated_keys() {
        let q = QueryParams::new()
            .param("page", 2)
            .multi_param("sort", ["name,asc", "id,desc"])
            .opt_param("compact", None::<bool>);

        assert_eq!(q.encode(), "page=2&sort=name%2Casc&sort=id%2Cdesc");
        assert_eq!(q.get_all("sort").collect::<Vec<_>>(), ["name,asc", "id,desc"]);
        assert_eq!(q.get("compact"), None);
    }

    #[test]
    fn opt_fields_selection() {
        let q = QueryParams::new().opt_fields::<&str>("optFields", None);
        assert!(q.is_empty());

        let q = QueryParams::new().opt_fields::<&str>("optFields", Some(&[]));
        assert_eq!(q.encode(), "optFields=none");

        let q = QueryParams::new().opt_fields("optFields", Some(&["tags", "msData"][..]));
        assert_eq!(q.encode(), "optFields=tags&optFields=msData");
    }

    #[test]
    fn values_are_escaped() {
        let q = QueryParams::new().param("filter", "tags.sample:\"blank 1\"");
        assert_eq!(q.encode(), "filter=tags.sample%3A%22blank+1%22");
    }
}
