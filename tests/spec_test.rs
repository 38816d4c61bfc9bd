use json_validate::{Registry, SerdeSchema, Validator};
use serde::Deserialize;
use serde_json::Value;
use std::fs;

#[derive(Deserialize)]
struct TestSuite {
    name: String,

    #[serde(default)]
    registry: Vec<SerdeSchema>,

    schema: SerdeSchema,
    instances: Vec<TestCase>,
}

#[derive(Deserialize)]
struct TestCase {
    instance: Value,
    errors: Vec<TestCaseError>,
}

#[derive(Debug, Deserialize, PartialEq)]
struct TestCaseError {
    #[serde(rename = "instancePath")]
    instance_path: String,

    #[serde(rename = "schemaPath")]
    schema_path: String,

    #[serde(rename = "schemaURI")]
    schema_uri: String,
}

fn sort_key(err: &TestCaseError) -> (String, String) {
    (err.schema_path.clone(), err.instance_path.clone())
}

#[test]
fn spec() -> Result<(), std::io::Error> {
    let mut test_files: Vec<_> = fs::read_dir("spec/tests")?
        .map(|entry| entry.expect("error getting dir entry").path())
        .collect();
    test_files.sort();

    for path in test_files {
        println!("{:?}", &path);
        let file = fs::read(path)?;
        let suites: Vec<TestSuite> =
            serde_json::from_slice(&file).expect("error parsing test suites");

        for suite in suites {
            println!("{}", suite.name);

            let mut schemas = suite.registry;
            schemas.push(suite.schema);

            let registry = Registry::build(schemas).expect("error building registry");
            let validator = Validator::new(&registry);

            for (i, mut test_case) in suite.instances.into_iter().enumerate() {
                println!("  instance {}", i);

                let mut actual_errors: Vec<_> = validator
                    .validate(&test_case.instance)
                    .expect("error validating instance")
                    .into_iter()
                    .map(|error| TestCaseError {
                        instance_path: error.instance_path().to_string(),
                        schema_path: error.schema_path().to_string(),
                        schema_uri: error
                            .schema_uri()
                            .as_ref()
                            .map(|uri| uri.to_string())
                            .unwrap_or_default(),
                    })
                    .collect();

                // Iteration order over object-backed collections is not
                // guaranteed, so both sides are sorted before comparing.
                actual_errors.sort_by_key(sort_key);
                test_case.errors.sort_by_key(sort_key);

                assert_eq!(
                    actual_errors, test_case.errors,
                    "{}, instance {}",
                    suite.name, i
                );
            }
        }
    }

    Ok(())
}
