use std::fs;
use std::path::Path;

use anyhow::Result;
use napigen::cache::SnapshotChange;
use napigen::config::ProjectConfig;
use napigen::pipeline::{GenerationStatus, generate};
use napigen::scanner::{ScanError, scan_model};
use tempfile::TempDir;

const SCOPE_HEADER: &str = "#pragma once\r\n\
/**\r\n\
 * Scoped drawing settings\r\n\
 */\r\n\
NAPI_CLASS_REF DebugDraw3DScopeConfig : public RefCounted {\r\n\
\t/**\r\n\
\t * Set the line thickness\r\n\
\t */\r\n\
\tNAPI Ref<DebugDraw3DScopeConfig> set_thickness(real_t _value) const;\r\n\
\tNAPI real_t get_thickness() const;\r\n\
};\r\n";

const DRAW_HEADER: &str = "#pragma once\n\
NAPI_CLASS_SINGLETON DebugDraw3D : public Object {\n\
\tNAPI void clear_all();\n\
\tNAPI void draw_points(const PackedVector3Array &points, const Color &color = Color(1, 0, 0), const real_t &duration = 0);\n\
};\n";

const FLAT_TEMPLATE: &str = "#include \"c_api_shared.hpp\"\n\
extern \"C\" {\n\
// GENERATOR_DD3D_FUNCTIONS_DEFINES\n\
}\n\
void register_functions() {\n\
\t\t// GENERATOR_DD3D_FUNCTIONS_REGISTERS\n\
}\n";

const WRAPPER_TEMPLATE: &str = "#pragma once\n\
#include \"c_api_shared.hpp\"\n\
// GENERATOR_DD3D_API_INCLUDES\n\
// GENERATOR_DD3D_API_FUNCTIONS\n";

const CONFIG: &str = r#"
headers = ["src/config_scope_3d.h", "src/debug_draw_3d.h"]
flat_api_template = "templates/c_api.cpp"
flat_api_out_dir = "src/gen"
wrapper_template = "templates/cpp/dd3d_cpp_api.hpp"
out_dir = "out/native_api"
shared_header = "templates/c_api_shared.hpp"
include_classes = ["camera3d"]
"#;

struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Result<Self> {
        let dir = tempfile::Builder::new().prefix("napigen-test").tempdir()?;
        let project = Self { dir };
        project.write("src/config_scope_3d.h", SCOPE_HEADER)?;
        project.write("src/debug_draw_3d.h", DRAW_HEADER)?;
        project.write("templates/c_api.cpp", FLAT_TEMPLATE)?;
        project.write("templates/cpp/dd3d_cpp_api.hpp", WRAPPER_TEMPLATE)?;
        project.write("templates/c_api_shared.hpp", "#define ADD_FUNC(f)\n")?;
        Ok(project)
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write(&self, relative: &str, contents: &str) -> Result<()> {
        let path = self.root().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)?;
        Ok(())
    }

    fn read(&self, relative: &str) -> Result<String> {
        Ok(fs::read_to_string(self.root().join(relative))?)
    }

    fn exists(&self, relative: &str) -> bool {
        self.root().join(relative).exists()
    }

    fn config(&self) -> Result<ProjectConfig> {
        ProjectConfig::from_toml_str(CONFIG, self.root())
    }
}

#[test]
fn generation_writes_every_target() -> Result<()> {
    let project = Project::new()?;
    let report = generate(&project.config()?)?;

    assert_eq!(report.status, GenerationStatus::Success);
    assert_eq!(report.status.code(), 0);
    assert_eq!(report.snapshot, Some(SnapshotChange::Created));

    let flat = project.read("src/gen/c_api.gen.cpp")?;
    assert!(flat.contains(
        "void DebugDraw3DScopeConfig_set_thickness(void * inst, real_t _value) {\n}\n"
    ));
    assert!(flat.contains("real_t DebugDraw3DScopeConfig_get_thickness(void * inst) {\n}\n"));
    assert!(flat.contains(
        "void DebugDraw3D_clear_all() {\n\tDebugDraw3D::get_singleton()->clear_all();\n}\n"
    ));
    assert!(flat.contains(
        "void DebugDraw3D_draw_points(const PackedVector3Array & points, const Color & color, const real_t & duration) {\n\
         \tDebugDraw3D::get_singleton()->draw_points(points, color, duration);\n}\n"
    ));
    assert!(flat.contains(
        "void register_functions() {\n\
         \t\tADD_FUNC(DebugDraw3DScopeConfig_set_thickness);\n\
         \t\tADD_FUNC(DebugDraw3DScopeConfig_get_thickness);\n\
         \t\tADD_FUNC(DebugDraw3D_clear_all);\n\
         \t\tADD_FUNC(DebugDraw3D_draw_points);\n}"
    ));
    assert!(!flat.contains("GENERATOR_DD3D"));

    let wrapper = project.read("out/native_api/cpp/dd3d_cpp_api.hpp")?;
    assert!(wrapper.contains("#include <godot_cpp/classes/camera3d.hpp>\n"));
    assert!(wrapper.contains(
        "/**\n * Scoped drawing settings\n */\nnamespace DebugDraw3DScopeConfig {\n"
    ));
    assert!(wrapper.contains(
        "/**\n * Set the line thickness\n */\n\
         static void set_thickness(void * inst, real_t _value) {\n\
         \tstatic void(*DebugDraw3DScopeConfig_set_thickness)(void *, real_t) = nullptr;\n\
         \tLOAD_AND_CALL_FUNC_POINTER(DebugDraw3DScopeConfig_set_thickness, inst, _value);\n}\n"
    ));
    assert!(wrapper.contains(
        "\tLOAD_AND_CALL_FUNC_POINTER_RET(DebugDraw3DScopeConfig_get_thickness, {}, inst);\n"
    ));
    assert!(wrapper.contains(
        "\tstatic void(*DebugDraw3D_draw_points)(const PackedVector3Array &, const Color &, const real_t &) = nullptr;\n"
    ));
    assert!(wrapper.contains("} // namespace DebugDraw3DScopeConfig\n"));
    assert!(wrapper.contains("} // namespace DebugDraw3D\n"));

    assert_eq!(
        project.read("out/native_api/cpp/c_api_shared.hpp")?,
        "#define ADD_FUNC(f)\n"
    );

    let snapshot: serde_json::Value =
        serde_json::from_str(&project.read("out/native_api/api.json")?)?;
    let model = report.model.expect("model");
    assert_eq!(snapshot["hash"], model.content_hash());
    let classes = snapshot["classes"].as_object().expect("classes object");
    assert_eq!(classes.len(), 2);
    let draw_points = &classes["DebugDraw3D"]["functions"]["DebugDraw3D_draw_points"];
    assert_eq!(draw_points["args"][1]["default"], "Color(1, 0, 0)");
    assert_eq!(draw_points["args"][1]["c_type"], "const Color");
    assert_eq!(
        classes["DebugDraw3DScopeConfig"]["functions"]["DebugDraw3DScopeConfig_set_thickness"]
            ["self_return"],
        true
    );
    Ok(())
}

#[test]
fn plain_class_and_singleton_generate_two_functions() -> Result<()> {
    let project = Project::new()?;
    project.write(
        "src/config_scope_3d.h",
        "/**\n * A box\n */\nNAPI_CLASS Box {\n/**\n * Computes foo\n */\nNAPI int Foo(float x = 1.0);\n};\n",
    )?;
    project.write("src/debug_draw_3d.h", "NAPI_CLASS_SINGLETON DD {\nNAPI void Bar();\n};\n")?;

    let report = generate(&project.config()?)?;
    assert_eq!(report.status, GenerationStatus::Success);

    let flat = project.read("src/gen/c_api.gen.cpp")?;
    assert!(flat.contains("int Box_Foo(void * inst, float x) {\n}\n"));
    assert!(flat.contains("void DD_Bar() {\n\tDD::get_singleton()->Bar();\n}\n"));
    assert_eq!(flat.matches("ADD_FUNC(").count(), 2);
    assert!(flat.contains("\t\tADD_FUNC(Box_Foo);\n\t\tADD_FUNC(DD_Bar);\n"));

    let wrapper = project.read("out/native_api/cpp/dd3d_cpp_api.hpp")?;
    let namespaces: Vec<_> = wrapper
        .lines()
        .filter(|line| line.starts_with("namespace "))
        .collect();
    assert_eq!(namespaces, ["namespace Box {", "namespace DD {"]);
    assert!(wrapper.contains(
        "/**\n * Computes foo\n */\n\
         static int Foo(void * inst, float x) {\n\
         \tstatic int(*Box_Foo)(void *, float) = nullptr;\n\
         \tLOAD_AND_CALL_FUNC_POINTER_RET(Box_Foo, {}, inst, x);\n}\n"
    ));
    assert!(wrapper.contains("\tLOAD_AND_CALL_FUNC_POINTER(DD_Bar, );\n"));

    let snapshot: serde_json::Value =
        serde_json::from_str(&project.read("out/native_api/api.json")?)?;
    let classes = snapshot["classes"].as_object().expect("classes object");
    assert_eq!(classes.len(), 2);
    assert_eq!(classes["Box"]["singleton"], false);
    assert_eq!(classes["Box"]["refcounted"], false);
    assert_eq!(classes["DD"]["singleton"], true);
    Ok(())
}

#[test]
fn regeneration_reports_unchanged_snapshot() -> Result<()> {
    let project = Project::new()?;
    let config = project.config()?;
    generate(&config)?;
    let again = generate(&config)?;
    assert_eq!(again.snapshot, Some(SnapshotChange::Unchanged));

    project.write(
        "src/debug_draw_3d.h",
        "NAPI_CLASS_SINGLETON DebugDraw3D {\nNAPI void clear_all();\n};\n",
    )?;
    let changed = generate(&config)?;
    assert!(matches!(changed.snapshot, Some(SnapshotChange::Changed { .. })));
    Ok(())
}

#[test]
fn missing_flat_marker_writes_nothing() -> Result<()> {
    let project = Project::new()?;
    project.write("templates/c_api.cpp", "// GENERATOR_DD3D_FUNCTIONS_DEFINES\n")?;

    let err = generate(&project.config()?).unwrap_err();
    assert!(format!("{err:#}").contains("GENERATOR_DD3D_FUNCTIONS_REGISTERS"));
    assert!(!project.exists("src/gen"));
    assert!(!project.exists("out"));
    Ok(())
}

#[test]
fn missing_wrapper_marker_keeps_flat_api_and_snapshot() -> Result<()> {
    let project = Project::new()?;
    project.write("templates/cpp/dd3d_cpp_api.hpp", "#pragma once\n")?;

    let report = generate(&project.config()?)?;
    assert_eq!(report.status, GenerationStatus::WrapperFailed);
    assert_eq!(report.status.code(), 111);
    assert!(project.exists("src/gen/c_api.gen.cpp"));
    assert!(project.exists("out/native_api/api.json"));
    assert!(!project.exists("out/native_api/cpp/dd3d_cpp_api.hpp"));
    Ok(())
}

#[test]
fn headers_without_annotations_produce_no_model() -> Result<()> {
    let project = Project::new()?;
    project.write("src/config_scope_3d.h", "#pragma once\nclass Plain {};\n")?;
    project.write("src/debug_draw_3d.h", "")?;

    let report = generate(&project.config()?)?;
    assert_eq!(report.status, GenerationStatus::NoModel);
    assert_eq!(report.status.code(), 110);
    assert!(!project.exists("src/gen"));
    assert!(!project.exists("out"));
    Ok(())
}

#[test]
fn malformed_declaration_aborts_before_writing() -> Result<()> {
    let project = Project::new()?;
    project.write(
        "src/debug_draw_3d.h",
        "NAPI_CLASS_SINGLETON DebugDraw3D {\nNAPI void draw(Vector<int a);\n};\n",
    )?;

    let err = generate(&project.config()?).unwrap_err();
    match err.downcast_ref::<ScanError>() {
        Some(ScanError::Signature { line, .. }) => assert_eq!(*line, 2),
        other => panic!("expected signature error, got {other:?}"),
    }
    assert!(!project.exists("src/gen"));
    assert!(!project.exists("out"));
    Ok(())
}

#[test]
fn hash_ignores_declaration_order() -> Result<()> {
    let project = Project::new()?;
    let scope = project.root().join("src/config_scope_3d.h");
    let draw = project.root().join("src/debug_draw_3d.h");

    let forward = scan_model(&[&scope, &draw])?.expect("model");
    let backward = scan_model(&[&draw, &scope])?.expect("model");

    assert_eq!(forward.content_hash(), backward.content_hash());
    let first = |model: &napigen::model::ApiModel| {
        model.classes().keys().next().map(str::to_string)
    };
    assert_ne!(first(&forward), first(&backward));
    Ok(())
}
