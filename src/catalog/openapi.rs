use serde_json::{json, Value};

use super::{pagination::DEFAULT_PAGE_SIZE, Resource};

/// OpenAPI paths and schemas for the CRUD routes of `E`, relative to the
/// module's mount point.
pub fn crud_fragment<E: Resource>() -> Value {
    let label = E::LABEL;
    let record_ref = json!({ "$ref": format!("#/components/schemas/{label}") });
    let draft_ref = json!({ "$ref": format!("#/components/schemas/{label}Draft") });
    let page_ref = json!({ "$ref": format!("#/components/schemas/{label}Page") });
    let id_param = json!({
        "name": "id",
        "in": "path",
        "required": true,
        "schema": { "type": "integer", "format": "int64", "minimum": 1 }
    });
    let tags = json!([label]);

    json!({
        "paths": {
            "/": {
                "get": {
                    "summary": format!("List {}", E::COLLECTION),
                    "tags": tags,
                    "parameters": [
                        {
                            "name": "page",
                            "in": "query",
                            "schema": { "type": "integer", "minimum": 1, "default": 1 }
                        },
                        {
                            "name": "pageSize",
                            "in": "query",
                            "schema": { "type": "integer", "minimum": 1, "default": DEFAULT_PAGE_SIZE }
                        }
                    ],
                    "responses": {
                        "200": sourced(format!("A page of {}", E::COLLECTION), page_ref),
                        "400": error_response("Invalid paging parameters"),
                        "500": error_response("Internal server error")
                    }
                },
                "post": {
                    "summary": format!("Create a {}", E::NAME),
                    "tags": tags,
                    "requestBody": json_body(draft_ref.clone()),
                    "responses": {
                        "201": json_response(format!("{label} created"), record_ref.clone()),
                        "400": error_response("Invalid payload"),
                        "409": error_response(&format!("{label} already exists")),
                        "500": error_response("Internal server error")
                    }
                }
            },
            "/{id}": {
                "get": {
                    "summary": format!("Get a {} by id", E::NAME),
                    "tags": tags,
                    "parameters": [id_param.clone()],
                    "responses": {
                        "200": sourced(label.to_string(), record_ref.clone()),
                        "400": error_response(&format!("Invalid {} ID", E::NAME)),
                        "404": error_response(&format!("{label} not found")),
                        "500": error_response("Internal server error")
                    }
                },
                "put": {
                    "summary": format!("Replace a {}", E::NAME),
                    "tags": tags,
                    "parameters": [id_param.clone()],
                    "requestBody": json_body(draft_ref),
                    "responses": {
                        "200": json_response(format!("{label} updated"), record_ref.clone()),
                        "400": error_response("Invalid payload"),
                        "409": error_response(&format!("{label} already exists")),
                        "500": error_response("Internal server error")
                    }
                },
                "delete": {
                    "summary": format!("Delete a {}", E::NAME),
                    "tags": tags,
                    "parameters": [id_param],
                    "responses": {
                        "200": json_response(
                            format!("{label} deleted"),
                            json!({
                                "type": "object",
                                "properties": { "message": { "type": "string" } }
                            })
                        ),
                        "400": error_response(&format!("Invalid {} ID", E::NAME)),
                        "404": error_response(&format!("{label} not found")),
                        "500": error_response("Internal server error")
                    }
                }
            }
        },
        "components": {
            "schemas": {
                label: E::schema(),
                format!("{label}Draft"): E::draft_schema(),
                format!("{label}Page"): {
                    "type": "object",
                    "properties": {
                        "page": { "type": "integer" },
                        "pageSize": { "type": "integer" },
                        "total": { "type": "integer" },
                        "totalPages": { "type": "integer" },
                        "data": { "type": "array", "items": record_ref }
                    },
                    "required": ["page", "pageSize", "total", "totalPages", "data"]
                }
            }
        }
    })
}

fn json_body(schema: Value) -> Value {
    json!({
        "required": true,
        "content": { "application/json": { "schema": schema } }
    })
}

fn json_response(description: String, schema: Value) -> Value {
    json!({
        "description": description,
        "content": { "application/json": { "schema": schema } }
    })
}

/// A read response, which also reports where it was served from.
fn sourced(description: String, schema: Value) -> Value {
    let mut response = json_response(description, schema);
    response["headers"] = json!({
        "X-Data-Source": {
            "description": "`cache` or `database`",
            "schema": { "type": "string", "enum": ["cache", "database"] }
        }
    });
    response
}

fn error_response(description: &str) -> Value {
    json!({
        "description": description,
        "content": {
            "application/json": {
                "schema": { "$ref": "#/components/schemas/ErrorResponse" }
            }
        }
    })
}
