use serde_json::{json, Value};

use crate::template::Resource;

/// One allow statement of an inline role policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PolicyStatement {
    pub actions: Vec<String>,
    pub resources: Vec<String>,
}

impl PolicyStatement {
    pub fn allow(actions: &[&str], resources: &[&str]) -> Self {
        Self {
            actions: actions.iter().map(|action| action.to_string()).collect(),
            resources: resources
                .iter()
                .map(|resource| resource.to_string())
                .collect(),
        }
    }

    fn to_value(&self) -> Value {
        json!({
            "Effect": "Allow",
            "Action": self.actions,
            "Resource": self.resources,
        })
    }
}

/// Log-group write access every handler function needs.
pub fn log_statement() -> PolicyStatement {
    PolicyStatement::allow(
        &[
            "logs:CreateLogGroup",
            "logs:CreateLogStream",
            "logs:PutLogEvents",
        ],
        &["arn:aws:logs:*:*:*"],
    )
}

/// Role assumable by one service principal, carrying exactly the given
/// inline statements.
pub fn service_role(service_principal: &str, statements: &[PolicyStatement]) -> Resource {
    Resource::new(
        "AWS::IAM::Role",
        json!({
            "AssumeRolePolicyDocument": {
                "Version": "2012-10-17",
                "Statement": [{
                    "Effect": "Allow",
                    "Principal": { "Service": service_principal },
                    "Action": "sts:AssumeRole",
                }],
            },
            "Policies": [{
                "PolicyName": "inline-policy",
                "PolicyDocument": {
                    "Version": "2012-10-17",
                    "Statement": statements
                        .iter()
                        .map(PolicyStatement::to_value)
                        .collect::<Vec<_>>(),
                },
            }],
        }),
    )
}

/// Execution role for a handler function: Lambda trust policy plus exactly
/// the given control-plane statements and log access.
pub fn lambda_execution_role(statements: &[PolicyStatement]) -> Resource {
    let mut all_statements = vec![log_statement()];
    all_statements.extend_from_slice(statements);
    service_role("lambda.amazonaws.com", &all_statements)
}

/// Flatten every action named by a role resource's inline policies. Tests
/// use this to hold wrappers to least privilege.
pub fn role_actions(role: &Resource) -> Vec<String> {
    let mut actions = Vec::new();
    let Some(policies) = role.properties.get("Policies").and_then(Value::as_array) else {
        return actions;
    };
    for policy in policies {
        let Some(statements) = policy
            .pointer("/PolicyDocument/Statement")
            .and_then(Value::as_array)
        else {
            continue;
        };
        for statement in statements {
            if let Some(statement_actions) = statement.get("Action").and_then(Value::as_array) {
                actions.extend(
                    statement_actions
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string),
                );
            }
        }
    }
    actions.sort();
    actions
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn execution_role_carries_lambda_trust_policy() {
        let role = lambda_execution_role(&[]);
        assert_eq!(role.resource_type, "AWS::IAM::Role");
        assert_eq!(
            role.properties
                .pointer("/AssumeRolePolicyDocument/Statement/0/Principal/Service"),
            Some(&json!("lambda.amazonaws.com"))
        );
    }

    #[test]
    fn execution_role_actions_are_logs_plus_given_statements() {
        let role = lambda_execution_role(&[PolicyStatement::allow(
            &["organizations:AttachPolicy"],
            &["*"],
        )]);

        assert_eq!(
            role_actions(&role),
            vec![
                "logs:CreateLogGroup",
                "logs:CreateLogStream",
                "logs:PutLogEvents",
                "organizations:AttachPolicy",
            ]
        );
    }
}
