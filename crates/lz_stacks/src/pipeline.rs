use serde_json::json;

use crate::iam::{service_role, PolicyStatement};
use crate::template::{get_att, reference, Resource, Template};

pub const REPOSITORY_ID: &str = "TestRepository";
pub const ARTIFACT_BUCKET_ID: &str = "ArtifactBucket";
pub const BUILD_PROJECT_ID: &str = "FunctionalTestProject";
pub const PIPELINE_ID: &str = "FunctionalTestPipeline";

/// Source repository and branch for the functional test suite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSpec {
    pub repository_name: String,
    pub branch: String,
}

/// Stack declaring the functional-test pipeline: a source repository, a
/// build project running the tests, and the pipeline wiring source into
/// test. Plain resource descriptions; no handler is involved.
pub fn functional_test_pipeline_stack(spec: &PipelineSpec) -> Template {
    let mut template = Template::new("Functional test pipeline");

    template.add_resource(
        REPOSITORY_ID,
        Resource::new(
            "AWS::CodeCommit::Repository",
            json!({
                "RepositoryName": spec.repository_name,
                "RepositoryDescription": "Functional tests for the landing zone",
            }),
        ),
    );

    template.add_resource(ARTIFACT_BUCKET_ID, Resource::new("AWS::S3::Bucket", json!({})));

    template.add_resource(
        "BuildRole",
        service_role(
            "codebuild.amazonaws.com",
            &[
                PolicyStatement::allow(
                    &[
                        "logs:CreateLogGroup",
                        "logs:CreateLogStream",
                        "logs:PutLogEvents",
                    ],
                    &["arn:aws:logs:*:*:*"],
                ),
                PolicyStatement::allow(
                    &["s3:GetObject", "s3:GetObjectVersion", "s3:PutObject"],
                    &["*"],
                ),
            ],
        ),
    );

    template.add_resource(
        BUILD_PROJECT_ID,
        Resource::new(
            "AWS::CodeBuild::Project",
            json!({
                "ServiceRole": get_att("BuildRole", "Arn"),
                "Source": { "Type": "CODEPIPELINE", "BuildSpec": "buildspec.yml" },
                "Artifacts": { "Type": "CODEPIPELINE" },
                "Environment": {
                    "Type": "LINUX_CONTAINER",
                    "ComputeType": "BUILD_GENERAL1_SMALL",
                    "Image": "aws/codebuild/amazonlinux2-x86_64-standard:5.0",
                },
            }),
        )
        .depends_on("BuildRole"),
    );

    template.add_resource(
        "PipelineRole",
        service_role(
            "codepipeline.amazonaws.com",
            &[
                PolicyStatement::allow(
                    &["codecommit:GetBranch", "codecommit:GetCommit", "codecommit:UploadArchive", "codecommit:GetUploadArchiveStatus"],
                    &["*"],
                ),
                PolicyStatement::allow(
                    &["codebuild:StartBuild", "codebuild:BatchGetBuilds"],
                    &["*"],
                ),
                PolicyStatement::allow(
                    &["s3:GetObject", "s3:GetObjectVersion", "s3:PutObject"],
                    &["*"],
                ),
            ],
        ),
    );

    template.add_resource(
        PIPELINE_ID,
        Resource::new(
            "AWS::CodePipeline::Pipeline",
            json!({
                "RoleArn": get_att("PipelineRole", "Arn"),
                "ArtifactStore": {
                    "Type": "S3",
                    "Location": reference(ARTIFACT_BUCKET_ID),
                },
                "Stages": [
                    {
                        "Name": "Source",
                        "Actions": [{
                            "Name": "Source",
                            "ActionTypeId": {
                                "Category": "Source",
                                "Owner": "AWS",
                                "Provider": "CodeCommit",
                                "Version": "1",
                            },
                            "Configuration": {
                                "RepositoryName": spec.repository_name,
                                "BranchName": spec.branch,
                            },
                            "OutputArtifacts": [{ "Name": "SourceOutput" }],
                        }],
                    },
                    {
                        "Name": "Test",
                        "Actions": [{
                            "Name": "FunctionalTests",
                            "ActionTypeId": {
                                "Category": "Test",
                                "Owner": "AWS",
                                "Provider": "CodeBuild",
                                "Version": "1",
                            },
                            "Configuration": {
                                "ProjectName": reference(BUILD_PROJECT_ID),
                            },
                            "InputArtifacts": [{ "Name": "SourceOutput" }],
                        }],
                    },
                ],
            }),
        )
        .depends_on(REPOSITORY_ID)
        .depends_on(BUILD_PROJECT_ID),
    );

    template
}
