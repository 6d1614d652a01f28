use blockql_sdk::config::{headers_file_path, HEADERS_ENV};

/// Print a compact command reference.
pub fn run() {
    let env_hint = if std::env::var(HEADERS_ENV).is_ok() {
        " (set)"
    } else {
        ""
    };
    let file_hint = if headers_file_path().is_some_and(|p| p.exists()) {
        " (found)"
    } else {
        ""
    };

    print!(
        r#"blockql: explore GraphQL endpoints and compile selection trees

COMMANDS:
  blockql roots <URL>                 Root entry points (query, mutation) and fragment targets
  blockql catalog <URL> <TYPE>        Selectable fields and fragments of a type
  blockql serialize <FILE>            Compile a selection tree (JSON, - for stdin) to query text
  blockql validate <URL> <FILE>       Report stale or misplaced nodes in a selection tree

SELECTION TREE (JSON):
  {{"endpointUrl": URL, "name": "user", "parentTypeName": "Query", "isObject": true,
   "arguments": [{{"name": "id", "typeString": "ID!", "value": "42"}}],
   "children": [{{"endpointUrl": URL, "name": "name", "parentTypeName": "User"}}, null]}}
  Omit parentTypeName for an inline fragment; null children are empty slots.

GLOBAL OPTIONS:
  --headers <JSON>      Extra introspection headers, e.g. '{{"authorization": "Bearer ..."}}'
  --timeout-secs <N>    Introspection timeout (default 30)
  --format human|json   Force output format (auto-detected by default)

HEADERS (in precedence order):
  1. --headers flag
  2. ${HEADERS_ENV} env var{env_hint}
  3. ~/.blockql_headers.json file{file_hint}

LOGGING:
  RUST_LOG=info|debug   Diagnostics on stderr (default warn)
"#
    );
}
