/*
 * Copyright Amazon.com, Inc. or its affiliates. All Rights Reserved.
 * SPDX-License-Identifier: Apache-2.0
 */

use bytes::Bytes;
use dynamo_marshal::{dynamo_item, MarshalError};
use dynamo_marshal::to_attribute_value;
use dynamo_types::input::{QueryRequest, ScanRequest};
use dynamo_types::model::{
    AttributeAction, AttributeDefinition, ComparisonOperator, Condition, ProvisionedThroughput,
    TableStatus,
};
use dynamo_types::{AttributeType, AttributeValue};
use dynamodb::test_connection::TestConnection;
use dynamodb::{Client, Config, Error};
use http::header::HeaderName;
use serde::Serialize;

const ENDPOINT: &str = "http://localhost:8000/";

#[derive(Serialize)]
struct Movie {
    title: &'static str,
    year: u16,
    rating: f64,
    genres: Vec<&'static str>,
}

dynamo_item!(Movie {
    title: "Title",
    year: "Year",
    rating: "Rating,omitempty",
    genres: "Genres",
});

#[derive(Serialize)]
struct MovieKey {
    title: &'static str,
    year: u16,
}

dynamo_item!(MovieKey {
    title: "Title",
    year: "Year",
});

fn request(target: &str, body: &'static str) -> http::Request<Bytes> {
    http::Request::builder()
        .method("POST")
        .uri(ENDPOINT)
        .header("content-type", "application/x-amz-json-1.0")
        .header("x-amz-target", format!("DynamoDB_20120810.{}", target))
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn response(status: u16, body: &'static str) -> http::Response<Bytes> {
    http::Response::builder()
        .status(status)
        .body(Bytes::from_static(body.as_bytes()))
        .unwrap()
}

fn client(events: Vec<(http::Request<Bytes>, http::Response<Bytes>)>) -> (Client<TestConnection>, TestConnection) {
    let conn = TestConnection::new(events);
    let config = Config::builder().endpoint(ENDPOINT.parse().unwrap()).build();
    (Client::new(config, conn.clone()), conn)
}

fn ignore_date() -> [HeaderName; 1] {
    [HeaderName::from_static("x-amz-date")]
}

#[tokio::test]
async fn put_item_sends_marshaled_record() {
    let (client, conn) = client(vec![(
        request(
            "PutItem",
            r#"{
                "TableName": "movies",
                "Item": {
                    "Title": {"S": "Alien"},
                    "Year": {"N": "1979"},
                    "Rating": {"N": "8.5"},
                    "Genres": {"SS": ["horror", "sci-fi"]}
                }
            }"#,
        ),
        response(200, "{}"),
    )]);
    let output = client
        .put_item(
            "movies",
            &Movie {
                title: "Alien",
                year: 1979,
                rating: 8.5,
                genres: vec!["horror", "", "sci-fi"],
            },
        )
        .await
        .unwrap();
    assert!(output.attributes.is_none());
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn get_item_raw_returns_attributes() {
    let (client, conn) = client(vec![(
        request(
            "GetItem",
            r#"{"TableName":"movies","Key":{"Title":{"S":"Alien"},"Year":{"N":"1979"}}}"#,
        ),
        response(
            200,
            r#"{"Item":{"Title":{"S":"Alien"},"Year":{"N":"1979"},"Rating":{"N":"8.5"}}}"#,
        ),
    )]);
    let output = client
        .get_item_raw("movies", &MovieKey { title: "Alien", year: 1979 })
        .await
        .unwrap();
    let item = output.item.unwrap();
    assert_eq!(item["Rating"], AttributeValue::N("8.5".into()));
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn update_item_leaves_key_attributes_out() {
    let (client, conn) = client(vec![(
        request(
            "UpdateItem",
            r#"{
                "TableName": "movies",
                "Key": {"Title": {"S": "Alien"}, "Year": {"N": "1979"}},
                "AttributeUpdates": {
                    "Rating": {"Value": {"N": "9"}, "Action": "PUT"},
                    "Genres": {"Value": {"SS": ["horror"]}, "Action": "PUT"}
                }
            }"#,
        ),
        response(200, "{}"),
    )]);
    client
        .update_item(
            "movies",
            &MovieKey { title: "Alien", year: 1979 },
            &Movie {
                title: "Alien",
                year: 1979,
                rating: 9.0,
                genres: vec!["horror"],
            },
            AttributeAction::Put,
        )
        .await
        .unwrap();
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn update_item_refuses_wide_keys() {
    let (client, conn) = client(vec![]);
    let err = client
        .update_item(
            "movies",
            &Movie {
                title: "Alien",
                year: 1979,
                rating: 8.5,
                genres: vec![],
            },
            &MovieKey { title: "Alien", year: 1979 },
            AttributeAction::Put,
        )
        .await
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn batch_write_over_the_limit_sends_nothing() {
    let (client, conn) = client(vec![]);
    let keys: Vec<MovieKey> = (0..26)
        .map(|year| MovieKey {
            title: "Alien",
            year: 1979 + year,
        })
        .collect();
    match client.batch_write("movies", &keys).await {
        Err(Error::Marshal(MarshalError::TooManyItems { limit, found })) => {
            assert_eq!((limit, found), (25, 26));
        }
        other => panic!("expected a capacity error, got {:?}", other),
    }
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn batch_write_returns_unprocessed_items() {
    let (client, conn) = client(vec![(
        request(
            "BatchWriteItem",
            r#"{"RequestItems":{"movies":[
                {"PutRequest":{"Item":{"Title":{"S":"Alien"},"Year":{"N":"1979"}}}},
                {"PutRequest":{"Item":{"Title":{"S":"Aliens"},"Year":{"N":"1986"}}}}
            ]}}"#,
        ),
        response(
            200,
            r#"{"UnprocessedItems":{"movies":[{"PutRequest":{"Item":{"Title":{"S":"Aliens"},"Year":{"N":"1986"}}}}]}}"#,
        ),
    )]);
    let output = client
        .batch_write(
            "movies",
            &[
                MovieKey { title: "Alien", year: 1979 },
                MovieKey { title: "Aliens", year: 1986 },
            ],
        )
        .await
        .unwrap();
    assert_eq!(output.unprocessed_items["movies"].len(), 1);
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn delete_item_by_key() {
    let (client, conn) = client(vec![(
        request(
            "DeleteItem",
            r#"{"TableName":"movies","Key":{"Title":{"S":"Alien"},"Year":{"N":"1979"}}}"#,
        ),
        response(200, "{}"),
    )]);
    client
        .delete_item("movies", &MovieKey { title: "Alien", year: 1979 })
        .await
        .unwrap();
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn batch_get_raw_projects_attributes() {
    let (client, conn) = client(vec![(
        request(
            "BatchGetItem",
            r#"{"RequestItems":{"movies":{
                "Keys":[{"Title":{"S":"Alien"},"Year":{"N":"1979"}}],
                "AttributesToGet":["Rating"]
            }}}"#,
        ),
        response(
            200,
            r#"{"Responses":{"movies":[{"Rating":{"N":"8.5"}}]},"UnprocessedKeys":{}}"#,
        ),
    )]);
    let key = dynamo_marshal::marshal(&MovieKey { title: "Alien", year: 1979 }).unwrap();
    let output = client
        .batch_get_raw("movies", vec![key], vec!["Rating".to_string()])
        .await
        .unwrap();
    assert_eq!(
        output.responses["movies"][0]["Rating"],
        AttributeValue::N("8.5".into())
    );
    assert!(output.unprocessed_keys.is_empty());
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn batch_get_raw_refuses_too_many_keys() {
    let (client, conn) = client(vec![]);
    let keys = (0..101)
        .map(|year| dynamo_marshal::marshal(&MovieKey { title: "Alien", year }).unwrap())
        .collect();
    assert!(matches!(
        client.batch_get_raw("movies", keys, vec![]).await,
        Err(Error::InvalidInput(_))
    ));
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn query_and_scan_pass_conditions_through() {
    let (client, conn) = client(vec![
        (
            request(
                "Query",
                r#"{
                    "TableName": "movies",
                    "KeyConditions": {
                        "Title": {"AttributeValueList": [{"S": "Alien"}], "ComparisonOperator": "EQ"}
                    },
                    "ScanIndexForward": false,
                    "Limit": 1
                }"#,
            ),
            response(
                200,
                r#"{"Count":1,"ScannedCount":1,"Items":[{"Title":{"S":"Alien"},"Year":{"N":"1979"}}],
                    "LastEvaluatedKey":{"Title":{"S":"Alien"},"Year":{"N":"1979"}}}"#,
            ),
        ),
        (
            request(
                "Scan",
                r#"{
                    "TableName": "movies",
                    "ScanFilter": {
                        "Year": {"AttributeValueList": [{"N": "1970"}, {"N": "1979"}], "ComparisonOperator": "BETWEEN"}
                    }
                }"#,
            ),
            response(200, r#"{"Count":0,"ScannedCount":12,"Items":[]}"#),
        ),
    ]);

    let mut query = QueryRequest {
        table_name: "movies".into(),
        scan_index_forward: Some(false),
        limit: Some(1),
        ..Default::default()
    };
    query.key_conditions.insert(
        "Title".into(),
        Condition::eq(to_attribute_value(&"Alien").unwrap().unwrap()),
    );
    let page = client.query_raw(&query).await.unwrap();
    assert_eq!(page.count, 1);
    assert!(page.last_evaluated_key.is_some());

    let mut scan = ScanRequest {
        table_name: "movies".into(),
        ..Default::default()
    };
    scan.scan_filter.insert(
        "Year".into(),
        Condition::new(
            ComparisonOperator::Between,
            vec![AttributeValue::N("1970".into()), AttributeValue::N("1979".into())],
        ),
    );
    let page = client.scan_raw(&scan).await.unwrap();
    assert_eq!((page.count, page.scanned_count), (0, Some(12)));
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn list_tables_pages() {
    let (client, conn) = client(vec![(
        request("ListTables", r#"{"ExclusiveStartTableName":"books","Limit":2}"#),
        response(
            200,
            r#"{"TableNames":["movies","shows"],"LastEvaluatedTableName":"shows"}"#,
        ),
    )]);
    let output = client.list_tables(Some("books"), Some(2)).await.unwrap();
    assert_eq!(output.table_names, vec!["movies", "shows"]);
    assert_eq!(output.last_evaluated_table_name.as_deref(), Some("shows"));
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn create_table_simple() {
    let (client, conn) = client(vec![(
        request(
            "CreateTable",
            r#"{
                "TableName": "movies",
                "AttributeDefinitions": [
                    {"AttributeName": "Title", "AttributeType": "S"},
                    {"AttributeName": "Year", "AttributeType": "N"}
                ],
                "KeySchema": [
                    {"AttributeName": "Title", "KeyType": "HASH"},
                    {"AttributeName": "Year", "KeyType": "RANGE"}
                ],
                "ProvisionedThroughput": {"ReadCapacityUnits": 5, "WriteCapacityUnits": 10}
            }"#,
        ),
        response(
            200,
            r#"{"TableDescription":{"TableName":"movies","TableStatus":"CREATING","CreationDateTime":1.36372808007E9}}"#,
        ),
    )]);
    let description = client
        .create_table_simple(
            "movies",
            AttributeDefinition {
                name: "Title".into(),
                attribute_type: AttributeType::S,
            },
            Some(AttributeDefinition {
                name: "Year".into(),
                attribute_type: AttributeType::N,
            }),
            ProvisionedThroughput::new(5, 10),
        )
        .await
        .unwrap();
    assert_eq!(description.table_name, "movies");
    assert_eq!(description.table_status, Some(TableStatus::Creating));
    assert!(description.created_at().is_some());
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn create_table_simple_validates_before_sending() {
    let (client, conn) = client(vec![]);
    let hash = || AttributeDefinition {
        name: "Title".into(),
        attribute_type: AttributeType::S,
    };
    let cases = vec![
        client
            .create_table_simple("mv", hash(), None, ProvisionedThroughput::new(1, 1))
            .await,
        client
            .create_table_simple("movies", hash(), None, ProvisionedThroughput::new(0, 1))
            .await,
        client
            .create_table_simple(
                "movies",
                AttributeDefinition {
                    name: "Genres".into(),
                    attribute_type: AttributeType::Ss,
                },
                None,
                ProvisionedThroughput::new(1, 1),
            )
            .await,
    ];
    for result in cases {
        assert!(matches!(result, Err(Error::InvalidInput(_))), "{:?}", result);
    }
    assert!(conn.requests().is_empty());
}

#[tokio::test]
async fn describe_change_and_delete_table() {
    let (client, conn) = client(vec![
        (
            request("DescribeTable", r#"{"TableName":"movies"}"#),
            response(200, r#"{"Table":{"TableName":"movies","TableStatus":"ACTIVE","ItemCount":3}}"#),
        ),
        (
            request(
                "UpdateTable",
                r#"{"TableName":"movies","ProvisionedThroughput":{"ReadCapacityUnits":20,"WriteCapacityUnits":5}}"#,
            ),
            response(200, r#"{"TableDescription":{"TableName":"movies","TableStatus":"UPDATING"}}"#),
        ),
        (
            request("DeleteTable", r#"{"TableName":"movies"}"#),
            response(200, r#"{"TableDescription":{"TableName":"movies","TableStatus":"DELETING"}}"#),
        ),
    ]);
    let described = client.describe_table("movies").await.unwrap();
    assert_eq!(described.item_count, 3);
    let updated = client.change_throughput("movies", 20, 5).await.unwrap();
    assert_eq!(updated.table_status, Some(TableStatus::Updating));
    let deleted = client.delete_table("movies").await.unwrap();
    assert_eq!(deleted.table_status, Some(TableStatus::Deleting));
    conn.assert_requests_match(&ignore_date());
}

#[tokio::test]
async fn service_errors_carry_status_and_code() {
    let (client, _conn) = client(vec![(
        request("DescribeTable", r#"{"TableName":"missing"}"#),
        response(
            400,
            r#"{"__type":"com.amazonaws.dynamodb.v20120810#ResourceNotFoundException","message":"Requested resource not found"}"#,
        ),
    )]);
    let err = client.describe_table("missing").await.unwrap_err();
    let service_error = err.service_error().unwrap();
    assert_eq!(service_error.status(), 400);
    assert!(service_error.is_resource_not_found());
    assert_eq!(service_error.message(), "Requested resource not found");
}

#[tokio::test]
async fn connector_failures_are_dispatch_errors() {
    let (client, _conn) = client(vec![]);
    assert!(matches!(
        client.list_tables(None, None).await,
        Err(Error::Dispatch(_))
    ));
}
