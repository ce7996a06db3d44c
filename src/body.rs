use serde::Serialize;

/// Request body for POST/PUT calls: an insertion-ordered list of field name to
/// raw JSON fragment pairs.
///
/// The wire encoding reproduces the concatenation format the ShipStation API
/// has always been fed by this client: each pair renders as ` "name" : value `
/// with the fragment inserted verbatim, pairs joined by commas and wrapped in
/// braces. [`RequestBody::raw`] takes a pre-encoded fragment (a string value
/// must carry its own quotes); the typed helpers encode the value properly so
/// callers do not hand-quote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestBody {
    fields: Vec<(String, String)>,
}

impl RequestBody {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field whose value is already a valid JSON fragment, verbatim.
    /// `raw("orderId", "\"123\"")` sends the string `"123"`; passing `123`
    /// without quotes sends a number. No validation is performed.
    pub fn raw(mut self, name: impl Into<String>, fragment: impl Into<String>) -> Self {
        self.fields.push((name.into(), fragment.into()));
        self
    }

    /// Insert a string field, JSON-quoted and escaped.
    pub fn string(self, name: impl Into<String>, value: impl AsRef<str>) -> Self {
        let fragment = serde_json::to_string(value.as_ref()).unwrap_or_default();
        self.raw(name, fragment)
    }

    /// Insert a numeric field.
    pub fn number(self, name: impl Into<String>, value: impl Into<serde_json::Number>) -> Self {
        self.raw(name, value.into().to_string())
    }

    /// Insert a boolean field.
    pub fn boolean(self, name: impl Into<String>, value: bool) -> Self {
        self.raw(name, if value { "true" } else { "false" })
    }

    /// Insert any serializable value (nested objects, arrays, null).
    pub fn json<T: Serialize>(self, name: impl Into<String>, value: &T) -> Self {
        let fragment = serde_json::to_string(value).unwrap_or_else(|_| "null".to_string());
        self.raw(name, fragment)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Render the wire form, e.g. `{ "orderId" : "123" , "count" : 5 }`.
    pub fn encode(&self) -> String {
        let pairs: Vec<String> = self
            .fields
            .iter()
            .map(|(name, fragment)| format!(" \"{name}\" : {fragment} "))
            .collect();
        format!("{{{}}}", pairs.join(","))
    }
}
