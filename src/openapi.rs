//! OpenAPI document generated from the discovered schema.

use crate::schema::TableDescriptor;
use std::sync::Arc;
use utoipa::openapi::path::{
    HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItem, PathItemBuilder,
};
use utoipa::openapi::{InfoBuilder, OpenApi, OpenApiBuilder, PathsBuilder, Required, ResponseBuilder};

fn operation(table: &TableDescriptor, id: &str, summary: String) -> OperationBuilder {
    OperationBuilder::new()
        .operation_id(Some(format!("{}_{}", table.name, id)))
        .summary(Some(summary))
        .tags(Some(vec![table.name.clone()]))
}

fn ok(description: &str) -> utoipa::openapi::Response {
    ResponseBuilder::new().description(description).build()
}

fn table_items(table: &TableDescriptor) -> Vec<(String, PathItem)> {
    let name = &table.name;

    let list: Operation = operation(table, "all", format!("List all rows of {}", name))
        .response("200", ok("JSON array of rows"))
        .response("500", ok("Store failure"))
        .build();
    let post: Operation = operation(table, "post", format!("Insert a row into {}", name))
        .description(Some(
            "Body is a JSON object; keys that are not columns are ignored. Returns the inserted row.",
        ))
        .response("200", ok("Inserted row"))
        .response("400", ok("Body is not a JSON object"))
        .response("500", ok("No valid columns, or store failure"))
        .build();

    let mut search = operation(table, "search", format!("Search {} by exact column values", name))
        .description(Some(
            "Query parameters are column=value pairs combined with AND. Unknown keys are ignored; \
             with no valid key every row is returned.",
        ))
        .response("200", ok("JSON array of matching rows"));
    for col in &table.columns {
        search = search.parameter(
            ParameterBuilder::new()
                .name(&col.name)
                .parameter_in(ParameterIn::Query)
                .required(Required::False)
                .build(),
        );
    }

    let key = table.primary_key.as_deref().unwrap_or("rowid");
    let get = operation(table, "get", format!("Get one row of {} by {}", name, key))
        .parameter(
            ParameterBuilder::new()
                .name("id")
                .parameter_in(ParameterIn::Path)
                .required(Required::True)
                .description(Some(format!("Value of {}", key)))
                .build(),
        )
        .response("200", ok("Matching row"))
        .response("404", ok("No such row"))
        .build();

    vec![
        (
            table.base_path(),
            PathItemBuilder::new()
                .operation(HttpMethod::Get, list)
                .operation(HttpMethod::Post, post)
                .build(),
        ),
        (table.search_path(), PathItem::new(HttpMethod::Get, search.build())),
        (format!("/{}/{{id}}", name), PathItem::new(HttpMethod::Get, get)),
    ]
}

/// One path set per routed table plus the aggregate read.
pub fn build(tables: &[&Arc<TableDescriptor>]) -> OpenApi {
    let mut paths = PathsBuilder::new();
    for table in tables {
        for (path, item) in table_items(table) {
            paths = paths.path(path, item);
        }
    }
    let all = OperationBuilder::new()
        .operation_id(Some("all"))
        .summary(Some("Games joined with host places and countries"))
        .response("200", ok("JSON array of denormalized rows"))
        .build();
    paths = paths.path("/all", PathItem::new(HttpMethod::Get, all));

    OpenApiBuilder::new()
        .info(
            InfoBuilder::new()
                .title("Paralympics API")
                .version(env!("CARGO_PKG_VERSION"))
                .build(),
        )
        .paths(paths.build())
        .build()
}

