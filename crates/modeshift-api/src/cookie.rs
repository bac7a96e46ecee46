// Session cookie extraction.
//
// The controller's session cookie is taken by position, not by name. The
// input is the one-line cookie-jar rendering of the login response:
//
//     <CookieJar[<Cookie JSESSIONID=0a1b2c for 10.0.0.1/>]>
//
// Fields are split on single spaces and the second field (`JSESSIONID=0a1b2c`)
// is the value sent back verbatim in the `Cookie` header. When the login
// response sets several cookies only the first one is picked up.

/// Render the cookies set by a response in the jar format parsed by
/// [`parse_session_cookie`].
pub fn render_jar<'a>(cookies: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) -> String {
    let inner: Vec<String> = cookies
        .into_iter()
        .map(|(name, value, domain)| format!("<Cookie {name}={value} for {domain}/>"))
        .collect();
    format!("<CookieJar[{}]>", inner.join(", "))
}

/// Take the second space-delimited field of a rendered cookie jar.
///
/// Returns `None` when there is no second field or it is not a
/// `name=value` pair (an empty jar renders as `<CookieJar[]>`).
pub fn parse_session_cookie(raw: &str) -> Option<String> {
    let field = raw.split(' ').nth(1)?;
    if field.is_empty() || !field.contains('=') {
        return None;
    }
    Some(field.to_owned())
}
