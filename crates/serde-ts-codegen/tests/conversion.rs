use std::thread;

use serde_ts_codegen::{
    CodeGenerator, ConversionOptions, ConversionRequest, Error, TypeCatalog, TypeRegistry, convert,
};

const MODELS: &str = r#"
    use std::collections::HashMap;

    #[derive(Serialize)]
    pub struct Address {
        pub duration: f64,
        #[serde(rename = "text", skip_serializing_if = "String::is_empty")]
        pub text1: String,
        #[serde(rename = "", skip_serializing_if = "String::is_empty")]
        pub text2: String,
        #[serde(skip)]
        pub text3: String,
    }

    #[derive(Serialize)]
    pub struct Dummy {
        pub something: String,
    }

    #[derive(Serialize)]
    pub struct HasName {
        pub name: String,
    }

    #[derive(Serialize)]
    pub struct Person {
        #[serde(flatten)]
        pub has_name: HasName,
        pub nicknames: Vec<String>,
        pub addresses: Vec<Address>,
        pub address: Option<Box<Address>>,
        #[ts(type = "{[key:string]:string}")]
        pub metadata: Vec<u8>,
        pub friends: Vec<Box<Person>>,
        #[serde(rename = "a")]
        pub dummy: Dummy,
    }
"#;

fn generator(source: &str) -> CodeGenerator {
    let mut generator = CodeGenerator::new();
    generator.add_source_str(source).unwrap();
    generator.options_mut().emit_reconstruction_routines = false;
    generator
}

fn create_from(generator: &mut CodeGenerator) -> &mut CodeGenerator {
    generator.options_mut().emit_reconstruction_routines = true;
    generator
}

const PERSON_DECLARATIONS: &str = "\
interface Dummy {
    something: string;
}
interface Address {
    duration: number;
    text?: string;
}
interface Person {
    name: string;
    nicknames: string[];
    addresses: Address[];
    address: Address;
    metadata: {[key:string]:string};
    friends: Person[];
    a: Dummy;
}
";

#[test]
fn test_with_types() {
    let mut generator = generator(MODELS);
    generator.add_type("Person");
    let code = generator.generate().unwrap();
    assert_eq!(code, PERSON_DECLARATIONS.replace("interface ", "export interface "));
}

#[test]
fn test_with_instances_without_export() {
    struct Person;
    struct Dummy;

    let mut generator = generator(MODELS);
    generator.options_mut().export_types = false;
    generator.add_instance(&Person).add_instance(&Dummy);
    assert_eq!(generator.generate().unwrap(), PERSON_DECLARATIONS);
}

#[test]
fn test_with_double_registration() {
    let mut generator = generator(MODELS);
    generator.add_type("Person").add_type("Person");
    let code = generator.generate().unwrap();
    assert_eq!(code, PERSON_DECLARATIONS.replace("interface ", "export interface "));
}

#[test]
fn test_with_prefixes_and_create_from() {
    let mut generator = generator(MODELS);
    create_from(&mut generator).add_type("Person");
    let options = generator.options_mut();
    options.name_prefix = "test_".to_string();
    options.name_suffix = "_test".to_string();
    options.export_types = false;

    let expected = r#"interface test_Dummy_test {
    something: string;

    static createFrom(source: any) {
        if ('string' === typeof source) source = JSON.parse(source);
        const result = new test_Dummy_test();
        result.something = source["something"];
        return result;
    }

}
interface test_Address_test {
    duration: number;
    text?: string;

    static createFrom(source: any) {
        if ('string' === typeof source) source = JSON.parse(source);
        const result = new test_Address_test();
        result.duration = source["duration"];
        result.text = source["text"];
        return result;
    }

}
interface test_Person_test {
    name: string;
    nicknames: string[];
    addresses: test_Address_test[];
    address: test_Address_test;
    metadata: {[key:string]:string};
    friends: test_Person_test[];
    a: test_Dummy_test;

    static createFrom(source: any) {
        if ('string' === typeof source) source = JSON.parse(source);
        const result = new test_Person_test();
        result.name = source["name"];
        result.nicknames = source["nicknames"];
        result.addresses = source["addresses"] ? source["addresses"].map(function(element: any) { return test_Address_test.createFrom(element); }) : null;
        result.address = source["address"] ? test_Address_test.createFrom(source["address"]) : null;
        result.metadata = source["metadata"];
        result.friends = source["friends"] ? source["friends"].map(function(element: any) { return test_Person_test.createFrom(element); }) : null;
        result.a = source["a"] ? test_Dummy_test.createFrom(source["a"]) : null;
        return result;
    }

}
"#;
    assert_eq!(generator.generate().unwrap(), expected);
}

#[test]
fn test_custom_type_override() {
    let mut generator = generator(
        r#"
        use std::collections::HashMap;
        struct TestCustomType {
            #[ts(type = "{[key: string]: number}")]
            map: HashMap<String, i32>,
        }
    "#,
    );
    generator.add_type("TestCustomType");
    assert_eq!(
        generator.generate().unwrap(),
        "export interface TestCustomType {\n    map: {[key: string]: number};\n}\n"
    );
}

#[test]
fn test_date_transform() {
    let mut generator = generator(
        r#"
        use chrono::{DateTime, Utc};
        struct TestCustomType {
            #[ts(type = "Date", transform = "new Date(__VALUE__)")]
            time: DateTime<Utc>,
        }
    "#,
    );
    create_from(&mut generator).add_type("TestCustomType");

    let expected = r#"export interface TestCustomType {
    time: Date;

    static createFrom(source: any) {
        if ('string' === typeof source) source = JSON.parse(source);
        const result = new TestCustomType();
        result.time = new Date(source["time"]);
        return result;
    }

}
"#;
    assert_eq!(generator.generate().unwrap(), expected);
}

#[test]
fn test_recursive() {
    let mut generator = generator("struct Test { children: Vec<Test> }");
    create_from(&mut generator).add_type("Test");

    let expected = r#"export interface Test {
    children: Test[];

    static createFrom(source: any) {
        if ('string' === typeof source) source = JSON.parse(source);
        const result = new Test();
        result.children = source["children"] ? source["children"].map(function(element: any) { return Test.createFrom(element); }) : null;
        return result;
    }

}
"#;
    assert_eq!(generator.generate().unwrap(), expected);
}

#[test]
fn test_array_of_arrays() {
    let mut generator = generator(
        r#"
        struct Key { key: String }
        struct Keyboard { keys: Vec<Vec<Key>> }
    "#,
    );
    create_from(&mut generator).add_type("Keyboard");

    let code = generator.generate().unwrap();
    assert!(code.starts_with("export interface Key {\n    key: string;\n"));
    assert!(code.contains("export interface Keyboard {\n    keys: Key[][];\n"));
    assert!(code.contains(
        "        result.keys = source[\"keys\"] ? source[\"keys\"].map(function(element: any) { return element.map(function(element: any) { return Key.createFrom(element); }); }) : null;\n"
    ));
}

#[test]
fn test_any() {
    let mut generator = generator("struct Test { #[serde(rename = \"field\")] any: serde_json::Value }");
    create_from(&mut generator).add_type("Test");

    let code = generator.generate().unwrap();
    assert!(code.contains("    field: any;\n"));
    assert!(code.contains("        result.field = source[\"field\"];\n"));
}

#[test]
fn test_override_on_custom_serialized_type() {
    let mut generator = generator(
        r#"
        struct NumberTime(chrono::DateTime<chrono::Utc>);

        impl Serialize for NumberTime {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i64(self.0.timestamp())
            }
        }

        struct Person {
            #[ts(type = "number")]
            birth: NumberTime,
            death: NumberTime,
        }
    "#,
    );
    generator.add_type("Person");
    assert_eq!(
        generator.generate().unwrap(),
        "export interface Person {\n    birth: number;\n    death: any;\n}\n"
    );
}

#[test]
fn test_nullability_follows_skip_serializing_if() {
    let mut generator = generator(
        r#"
        struct Profile {
            bio: Option<String>,
            #[serde(skip_serializing_if = "Option::is_none")]
            motto: Option<String>,
        }
    "#,
    );
    generator.add_type("Profile");
    let code = generator.generate().unwrap();
    assert!(code.contains("    bio: string;\n"));
    assert!(code.contains("    motto?: string;\n"));
}

#[test]
fn test_modules_and_name_collisions() {
    let mut generator = generator(
        r#"
        mod billing {
            pub struct Address { street: String }
            pub struct Invoice { to: Address, from: super::shipping::Address }
        }
        mod shipping {
            pub struct Address { dock: u32 }
        }
    "#,
    );
    generator.add_type("billing::Invoice");
    let code = generator.generate().unwrap();
    assert!(code.contains("export interface Address {\n    dock: number;\n}\n"));
    assert!(code.contains("export interface Address {\n    street: string;\n}\n"));
    assert!(code.ends_with("export interface Invoice {\n    to: Address;\n    from: Address;\n}\n"));
}

#[test]
fn test_invalid_root_type() {
    let mut generator = generator(MODELS);
    generator.add_type("Person").add_type("Vec<u8>");
    match generator.generate() {
        Err(Error::InvalidRootType { handle, reason }) => {
            assert_eq!(handle, "Vec<u8>");
            assert!(reason.contains("no such type"), "{reason}");
        }
        other => panic!("expected InvalidRootType, got {other:?}"),
    }
}

#[test]
fn test_parse_error_names_file() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("lib.rs"), "struct Broken {").unwrap();
    let mut generator = CodeGenerator::new();
    match generator.add_source_dir(dir.path()) {
        Err(Error::Parse { path, .. }) => assert!(path.ends_with("lib.rs")),
        other => panic!("expected a parse error, got {other:?}"),
    }
}

#[test]
fn test_deterministic_concurrent_conversions() {
    let mut catalog = TypeCatalog::new();
    catalog.add_source_str(MODELS).unwrap();
    let registry = TypeRegistry::with_builtins();
    let mut request = ConversionRequest::new(ConversionOptions::default());
    request.add_root("Person").add_root("Dummy");

    let expected = convert(&catalog, &registry, &request, None).unwrap();
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| scope.spawn(|| convert(&catalog, &registry, &request, None).unwrap()))
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn test_self_reference() {
    let mut generator = generator(
        "struct Tree { children: Vec<Self>, parent: Option<Box<Self>> }",
    );
    create_from(&mut generator).add_type("Tree");

    let code = generator.generate().unwrap();
    assert!(code.contains("    children: Tree[];\n    parent: Tree;\n"));
    assert!(code.contains(
        "        result.children = source[\"children\"] ? source[\"children\"].map(function(element: any) { return Tree.createFrom(element); }) : null;\n"
    ));
    assert!(code.contains(
        "        result.parent = source[\"parent\"] ? Tree.createFrom(source[\"parent\"]) : null;\n"
    ));
    assert_eq!(code.matches("export interface ").count(), 1);
}

#[test]
fn test_transparent_struct() {
    let mut generator = generator(
        r#"
        #[serde(transparent)]
        struct UserId { value: u64 }
        struct User { id: UserId, friends: Vec<UserId> }
    "#,
    );
    create_from(&mut generator).add_type("User");

    let code = generator.generate().unwrap();
    assert!(!code.contains("interface UserId"));
    assert!(code.contains("    id: number;\n    friends: number[];\n"));
    assert!(code.contains("        result.id = source[\"id\"];\n"));
}

#[test]
fn test_type_alias_reaches_records() {
    let mut generator = generator(
        r#"
        struct Person { name: String }
        type Friends = Vec<Person>;
        struct Group { members: Friends }
    "#,
    );
    generator.add_type("Group");
    assert_eq!(
        generator.generate().unwrap(),
        "export interface Person {\n    name: string;\n}\nexport interface Group {\n    members: Person[];\n}\n"
    );
}

#[test]
fn test_flattened_option_is_optional() {
    let mut generator = generator(
        r#"
        struct Paging { page: u32 }
        struct Query {
            term: String,
            #[serde(flatten)]
            paging: Option<Paging>,
        }
    "#,
    );
    generator.add_type("Query");
    assert_eq!(
        generator.generate().unwrap(),
        "export interface Query {\n    term: string;\n    page?: number;\n}\n"
    );
}
