pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Text served at `/`, with `host` filled into the example commands.
pub fn render_usage(host: &str) -> String {
    format!(
"jot {VERSION}

Anonymous text snippets over HTTP. The examples below use curl -i so the
response headers are visible.

Create a jot:
    curl -i --data-binary @notes.txt {host}/

    HTTP/1.1 201 Created
    Jot-Password: Kq7RmTd2xWbaZcE
    content-type: text/plain; charset=utf-8

    {host}/f3K_9dLq-wXz

Read a jot:
    curl -i {host}/f3K_9dLq-wXz

    HTTP/1.1 200 OK
    content-type: text/plain; charset=utf-8
    ETag: 2024-03-09T17:21:40.118042911Z

    contents of notes.txt

Replace a jot:
    curl -i -X PUT -H 'If-Match: 2024-03-09T17:21:40.118042911Z' \\
        --data-binary @notes.txt '{host}/f3K_9dLq-wXz?password=Kq7RmTd2xWbaZcE'

    HTTP/1.1 303 See Other
    location: /f3K_9dLq-wXz

Delete a jot:
    curl -i -X DELETE '{host}/f3K_9dLq-wXz?password=Kq7RmTd2xWbaZcE'

    HTTP/1.1 204 No Content

Keep the Jot-Password header of the create response, it is the only way to
edit or delete the jot later. Send the ETag back in If-None-Match to skip
downloading an unchanged jot, or in If-Match to refuse overwriting a jot
someone else changed in the meantime (412 Precondition Failed).
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mentions_version_and_host() {
        let usage = render_usage("https://jot.example");
        assert!(usage.starts_with(&format!("jot {VERSION}\n")));
        assert!(usage.contains("curl -i --data-binary @notes.txt https://jot.example/\n"));
        assert!(usage.contains("'https://jot.example/f3K_9dLq-wXz?password="));
    }
}
