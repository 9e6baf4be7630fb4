use super::DescriptorError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const SERVERLESS_FUNCTION_TYPE: &str = "AWS::Serverless::Function";
pub const TEMPLATE_FORMAT_VERSION: &str = "2010-09-09";
pub const SERVERLESS_TRANSFORM: &str = "AWS::Serverless-2016-10-31";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SamTemplate {
    #[serde(
        rename = "AWSTemplateFormatVersion",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub format_version: Option<String>,
    #[serde(rename = "Transform", default, skip_serializing_if = "Option::is_none")]
    pub transform: Option<serde_yaml::Value>,
    /// Declaration order is kept; discovery relies on it for first-match lookups.
    #[serde(rename = "Resources", default)]
    pub resources: IndexMap<String, TemplateResource>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TemplateResource {
    #[serde(rename = "Type")]
    pub resource_type: String,
    #[serde(rename = "Properties", default)]
    pub properties: FunctionProperties,
}

/// Function properties the pipeline reads or writes. Anything else a template declares is kept
/// in `other` so a parsed resource serializes back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionProperties {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_uri: Option<serde_yaml::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<serde_yaml::Value>,
    #[serde(flatten)]
    pub other: BTreeMap<String, serde_yaml::Value>,
}

impl SamTemplate {
    /// A template holding exactly one serverless function resource.
    pub fn single_function(
        resource_name: &str,
        code_uri: &Path,
        handler: &str,
        runtime: &str,
        environment: Option<serde_yaml::Value>,
    ) -> Self {
        let mut resources = IndexMap::new();
        resources.insert(
            resource_name.to_string(),
            TemplateResource {
                resource_type: SERVERLESS_FUNCTION_TYPE.to_string(),
                properties: FunctionProperties {
                    code_uri: Some(serde_yaml::Value::String(
                        code_uri.display().to_string(),
                    )),
                    handler: Some(handler.to_string()),
                    runtime: Some(runtime.to_string()),
                    environment,
                    other: BTreeMap::new(),
                },
            },
        );
        Self {
            format_version: Some(TEMPLATE_FORMAT_VERSION.to_string()),
            transform: Some(serde_yaml::Value::String(SERVERLESS_TRANSFORM.to_string())),
            resources,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, DescriptorError> {
        let raw = fs::read_to_string(path).map_err(|source| DescriptorError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| DescriptorError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn write_to(&self, path: &Path) -> Result<(), DescriptorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| DescriptorError::CreateDir {
                path: parent.display().to_string(),
                source,
            })?;
        }
        let body = serde_yaml::to_string(self).map_err(|source| DescriptorError::Encode {
            path: path.display().to_string(),
            source,
        })?;
        fs::write(path, body).map_err(|source| DescriptorError::Write {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn serverless_functions(&self) -> impl Iterator<Item = (&String, &TemplateResource)> {
        self.resources
            .iter()
            .filter(|(_, resource)| resource.resource_type == SERVERLESS_FUNCTION_TYPE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_function_template_serializes_pascal_case_properties() {
        let template = SamTemplate::single_function(
            "Fn",
            Path::new("/proj/src"),
            "sub/app.handler",
            "nodejs20.x",
            None,
        );
        let yaml = serde_yaml::to_string(&template).expect("encode");
        assert!(yaml.contains("AWSTemplateFormatVersion"));
        assert!(yaml.contains("AWS::Serverless::Function"));
        assert!(yaml.contains("CodeUri: /proj/src"));
        assert!(yaml.contains("Handler: sub/app.handler"));
        assert!(yaml.contains("Runtime: nodejs20.x"));
        assert!(!yaml.contains("Environment"));
    }

    #[test]
    fn unknown_properties_are_preserved() {
        let template: SamTemplate = serde_yaml::from_str(
            r#"
Resources:
  Api:
    Type: AWS::Serverless::Function
    Properties:
      Handler: app.handler
      Timeout: 30
      MemorySize: 256
  Bucket:
    Type: AWS::S3::Bucket
"#,
        )
        .expect("parse");

        let functions: Vec<_> = template.serverless_functions().collect();
        assert_eq!(functions.len(), 1);
        let props = &functions[0].1.properties;
        assert_eq!(props.handler.as_deref(), Some("app.handler"));
        assert_eq!(props.other.len(), 2);
        assert!(props.other.contains_key("Timeout"));
    }

    #[test]
    fn resources_keep_declaration_order() {
        let template: SamTemplate = serde_yaml::from_str(
            r#"
Resources:
  Zeta:
    Type: AWS::Serverless::Function
    Properties:
      Handler: app.handler
  Alpha:
    Type: AWS::Serverless::Function
    Properties:
      Handler: app.handler
"#,
        )
        .expect("parse");

        let names: Vec<_> = template
            .serverless_functions()
            .map(|(name, _)| name.as_str())
            .collect();
        assert_eq!(names, vec!["Zeta", "Alpha"]);
    }
}
