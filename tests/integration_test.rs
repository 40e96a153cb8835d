use docstring_swagger::{
    cli::{self, CliArgs},
    document::DocumentBuilder,
    error::Error,
    extractor::extract_declarations,
    model::{ModelBuilder, ModelRegistry},
    operation::build_operation,
    serializer::serialize_json,
    settings::Settings,
    source::SourceScanner,
};
use clap::Parser;
use pretty_assertions::assert_eq;
use serde_json::json;
use tempfile::TempDir;

/// Helper function to create a temporary test project
fn create_test_project(files: Vec<(&str, &str)>) -> TempDir {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");

    for (path, content) in files {
        let file_path = temp_dir.path().join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write test file");
    }

    temp_dir
}

fn widget_project() -> TempDir {
    create_test_project(vec![
        ("src/lib.rs", include_str!("fixtures/widget_api.rs")),
        ("src/broken.rs", "pub fn broken( {"),
    ])
}

#[test]
fn test_end_to_end_pipeline() {
    let project = widget_project();

    let scan = SourceScanner::new(project.path().to_path_buf())
        .scan()
        .expect("Failed to scan project");
    assert_eq!(scan.files.len(), 1, "broken.rs should be skipped");
    assert_eq!(scan.warnings.len(), 1);

    let extraction = extract_declarations(&scan.files);
    assert_eq!(extraction.models.len(), 2);
    assert_eq!(extraction.operations.len(), 5);
    assert!(matches!(
        extraction.operations.last(),
        Some(Err(Error::SignatureError { .. }))
    ));

    let mut registry = ModelRegistry::new();
    for model in extraction.models {
        let decl = model.expect("models should extract");
        let mut builder = ModelBuilder::new();
        builder.decorate((), &decl.declaration, &mut registry);
        // A second decoration must not register again
        builder.decorate((), &decl.declaration, &mut registry);
    }
    assert_eq!(registry.len(), 2);

    let mut settings = Settings::new();
    settings.merge([
        ("title", json!("Widget API")),
        ("exclude_namespaces", json!(["/internal"])),
    ]);
    let mut builder = DocumentBuilder::new(&settings);
    for operation in extraction.operations.into_iter().filter_map(Result::ok) {
        let descriptor = build_operation(&operation.declaration, operation.nickname.clone());
        if let Some(path) = operation.path.as_deref() {
            builder.add_operation(path, operation.method, &descriptor);
        }
    }
    let document = builder.build(&registry);

    let value = serde_json::to_value(&document).unwrap();
    assert_eq!(value["info"]["title"], "Widget API");

    let paths: Vec<_> = document.apis.iter().map(|a| a.path.as_str()).collect();
    assert_eq!(paths, vec!["/widgets/{id}", "/widgets"]);

    assert_eq!(
        value["apis"][0]["operations"][0],
        json!({
            "method": "GET",
            "nickname": "getWidget",
            "summary": "Fetch one widget",
            "parameters": [
                {
                    "name": "id",
                    "description": "Widget id",
                    "dataType": "integer",
                    "paramType": "path",
                    "required": true
                },
                {
                    "name": "expand",
                    "description": "Include parts",
                    "dataType": "string",
                    "paramType": "path",
                    "required": false
                }
            ],
            "responseMessages": [
                {"code": "200", "message": "The widget", "responseModel": "Widget"},
                {"code": "404", "message": "No such widget"}
            ]
        })
    );
    assert_eq!(value["apis"][0]["operations"][1]["method"], "DELETE");
    assert_eq!(value["apis"][0]["operations"][1]["nickname"], "delete");

    let list = &value["apis"][1]["operations"][0];
    assert_eq!(list["parameters"][0]["paramType"], "query");
    assert_eq!(list["parameters"][0]["required"], false);

    assert_eq!(
        value["models"]["Widget"],
        json!({
            "id": "Widget",
            "properties": {
                "name": {"type": "string", "description": "Display name"},
                "size": {"type": "integer", "default": 5},
                "parts": {
                    "type": "array",
                    "description": "Parts the widget is made of",
                    "items": {"type": "Part"}
                }
            },
            "required": ["name"],
            "summary": "A widget in the catalogue",
            "notes": "Widgets are created by the catalogue service and never deleted."
        })
    );
    assert_eq!(value["models"]["Part"]["required"], json!(["sku"]));
    assert_eq!(
        value["models"]["Part"]["properties"]["quantity"],
        json!({"type": "string", "default": null})
    );
}

#[test]
fn test_cli_writes_document() {
    let project = widget_project();
    let output = project.path().join("out").join("swagger.json");

    let args = CliArgs::parse_from([
        "docstring-swagger",
        project.path().to_str().unwrap(),
        "-o",
        output.to_str().unwrap(),
        "--set",
        "base_url=/v1",
        "--set",
        "enabled_methods=[\"get\"]",
    ]);
    let args = cli::parse_args_from_parsed(args).expect("arguments should validate");
    cli::run(args).expect("generation should succeed");

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(written["basePath"], "/v1");
    assert_eq!(written["swaggerVersion"], "1.2");

    // DELETE is not enabled, /internal is not excluded this time
    let methods: Vec<_> = written["apis"]
        .as_array()
        .unwrap()
        .iter()
        .flat_map(|api| api["operations"].as_array().unwrap().clone())
        .map(|op| op["method"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(methods, vec!["GET", "GET", "GET"]);
}

#[test]
fn test_generate_with_default_settings() {
    let project = widget_project();
    let args = CliArgs::parse_from(["docstring-swagger", project.path().to_str().unwrap()]);

    let settings = cli::load_settings(&args).unwrap();
    let document = cli::generate(&args, &settings).unwrap();
    let json = serialize_json(&document).unwrap();

    assert!(json.contains("\"responseModel\": \"Widget\""));
    assert_eq!(document.models.len(), 2);
    assert!(document
        .apis
        .iter()
        .any(|api| api.path == "/internal/health"));
}

#[test]
fn test_project_without_declarations() {
    let project = create_test_project(vec![("src/main.rs", "fn main() {}")]);
    let args = CliArgs::parse_from(["docstring-swagger", project.path().to_str().unwrap()]);

    let document = cli::generate(&args, &Settings::new()).unwrap();
    assert!(document.apis.is_empty());
    assert!(document.models.is_empty());
    assert_eq!(document.info.title, "API");
}
