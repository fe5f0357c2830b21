// Module layout (Clean Architecture style)
// - bootstrap: configuration, context assembly, pipeline composition
// - infrastructure: DB and realtime adapters
// - presentation: HTTP/WS handlers, middleware, views
// - application: ports and use cases
// - domain: core models

pub mod application;
pub mod bootstrap;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
