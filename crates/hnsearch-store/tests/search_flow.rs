//! Store driven against a mock search API over HTTP

use std::cell::RefCell;
use std::rc::Rc;

use hnsearch_client::{ClientConfig, HnSearchClient, SearchApi};
use hnsearch_store::{FetchError, FetchTicket, QueryResultStore};
use mockito::{Matcher, Server, ServerGuard};

type Pending = Rc<RefCell<Vec<FetchTicket>>>;

/// Run every dispatched fetch through the client and complete it on the store
async fn drain<D: hnsearch_store::FetchDispatcher>(
    store: &mut QueryResultStore<D>,
    pending: &Pending,
    client: &HnSearchClient,
) -> usize {
    let tickets: Vec<_> = pending.borrow_mut().drain(..).collect();
    let count = tickets.len();
    for ticket in tickets {
        let outcome = client
            .search(&ticket.key, ticket.page)
            .await
            .map_err(|e| FetchError::failed(e.to_string()));
        store.complete(ticket, outcome);
    }
    count
}

async fn mock_page(server: &mut ServerGuard, query: &str, page: u32, body: &str) -> mockito::Mock {
    server
        .mock("GET", "/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("query".into(), query.into()),
            Matcher::UrlEncoded("page".into(), page.to_string()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

fn client_for(server: &Server) -> HnSearchClient {
    let config = ClientConfig::default().with_base_url(&server.url()).unwrap();
    HnSearchClient::new(config).unwrap()
}

#[tokio::test]
async fn test_search_paginate_dismiss() {
    let mut server = Server::new_async().await;
    let first = mock_page(
        &mut server,
        "redux",
        0,
        r#"{"hits":[{"objectID":"1","title":"Redux","url":"https://redux.js.org","author":"dan","num_comments":2,"points":5}],"page":0}"#,
    )
    .await;
    let second = mock_page(
        &mut server,
        "redux",
        1,
        r#"{"hits":[{"objectID":"2","title":"Redux Toolkit","url":null,"author":"mark","num_comments":8,"points":30}],"page":1}"#,
    )
    .await;
    let client = client_for(&server);

    let pending: Pending = Rc::default();
    let sink = Rc::clone(&pending);
    let mut store = QueryResultStore::new("redux", move |t: FetchTicket| sink.borrow_mut().push(t));

    assert!(store.submit());
    assert_eq!(drain(&mut store, &pending, &client).await, 1);
    assert_eq!(store.hits().len(), 1);
    assert!(!store.is_loading());

    assert!(store.load_more());
    drain(&mut store, &pending, &client).await;
    let ids: Vec<_> = store.hits().iter().map(|h| h.object_id.as_str()).collect();
    assert_eq!(ids, ["1", "2"]);
    assert_eq!(store.page(), 1);

    // cached: no request
    store.set_active_query("redux");
    assert!(!store.submit());
    assert_eq!(drain(&mut store, &pending, &client).await, 0);

    assert!(store.dismiss("1"));
    assert_eq!(store.hits()[0].title, "Redux Toolkit");

    first.assert_async().await;
    second.assert_async().await;
}

#[tokio::test]
async fn test_server_error_is_captured() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/search")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;
    let client = client_for(&server);

    let pending: Pending = Rc::default();
    let sink = Rc::clone(&pending);
    let mut store = QueryResultStore::new("redux", move |t: FetchTicket| sink.borrow_mut().push(t));

    store.submit();
    drain(&mut store, &pending, &client).await;

    assert!(matches!(store.error(), Some(FetchError::FetchFailed { .. })));
    assert!(!store.is_loading());
    assert!(store.needs_fetch("redux"));
}

#[tokio::test]
async fn test_response_after_teardown_is_ignored() {
    let mut server = Server::new_async().await;
    let _mock = mock_page(&mut server, "redux", 0, r#"{"hits":[{"objectID":"1","title":"Redux"}],"page":0}"#).await;
    let client = client_for(&server);

    let pending: Pending = Rc::default();
    let sink = Rc::clone(&pending);
    let mut store = QueryResultStore::new("redux", move |t: FetchTicket| sink.borrow_mut().push(t));

    store.submit();
    store.teardown();
    drain(&mut store, &pending, &client).await;

    assert!(store.cache().is_empty());
    assert!(store.error().is_none());
    assert!(store.is_loading());
}
