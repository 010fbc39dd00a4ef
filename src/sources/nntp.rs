//! Usenet group source.
//!
//! Pulls the most recent postings of one group: `GROUP` to learn the last
//! article number, one batched `OVER` for the window of recent numbers,
//! then a `BODY` per overview entry. Subjects are RFC 2047 decoded; bodies
//! are read as ISO-8859-1 and joined with `\n`.

use super::Source;
use crate::error::Result;
use crate::models::NewsItem;
use crate::nntp::encoded_words::decode_header;
use crate::nntp::{GroupConnector, GroupInfo, GroupSession, TcpConnector};
use crate::utils::decode_latin1;
use async_trait::async_trait;
use itertools::Itertools;
use tracing::{debug, info, instrument, warn};

/// Fetches the last `how_many` postings of `group` on `server`.
#[derive(Debug, Clone)]
pub struct NntpGroupSource<C = TcpConnector> {
    server: String,
    group: String,
    how_many: u64,
    connector: C,
}

impl NntpGroupSource {
    /// Source speaking plain NNTP over TCP. `server` may carry a `:port`
    /// suffix; port 119 is used otherwise.
    pub fn new(server: impl Into<String>, group: impl Into<String>, how_many: u64) -> Self {
        Self {
            server: server.into(),
            group: group.into(),
            how_many,
            connector: TcpConnector,
        }
    }
}

impl<C: GroupConnector> NntpGroupSource<C> {
    /// Swap the transport used to reach the server.
    #[cfg(test)]
    pub fn with_connector<D: GroupConnector>(self, connector: D) -> NntpGroupSource<D> {
        NntpGroupSource {
            server: self.server,
            group: self.group,
            how_many: self.how_many,
            connector,
        }
    }

    /// Article number window `(first, last)` covering the newest
    /// `how_many` postings, or `None` when there is nothing to ask for.
    ///
    /// The lower bound is not clamped to the group's first article, only
    /// to 1; the server reports just the numbers that exist.
    pub fn window(&self, info: &GroupInfo) -> Option<(u64, u64)> {
        if self.how_many == 0 || info.count == 0 || info.last == 0 {
            return None;
        }
        let first = info.last.saturating_sub(self.how_many - 1).max(1);
        Some((first, info.last))
    }

    async fn collect_items(&self, session: &mut dyn GroupSession) -> Result<Vec<NewsItem>> {
        let info = session.group(&self.group).await?;
        let Some((first, last)) = self.window(&info) else {
            debug!(count = info.count, last = info.last, "Nothing to retrieve");
            return Ok(Vec::new());
        };
        debug!(
            count = info.count,
            group_first = info.first,
            first,
            last,
            "Requesting overview window"
        );

        let overviews = session.over(first, last).await?;
        let mut items = Vec::with_capacity(overviews.len());
        for entry in overviews {
            let title = decode_header(&entry.subject);
            let lines = session.body(entry.number).await?;
            let body = lines.iter().map(|line| decode_latin1(line)).join("\n");
            debug!(
                number = entry.number,
                message_id = %entry.message_id,
                author = %entry.author,
                date = %entry.date,
                %title,
                lines = lines.len(),
                "Fetched posting"
            );
            items.push(NewsItem::new(title, body));
        }
        Ok(items)
    }
}

#[async_trait]
impl<C: GroupConnector> Source for NntpGroupSource<C> {
    fn name(&self) -> String {
        format!("nntp://{}/{}", self.server, self.group)
    }

    #[instrument(level = "info", skip(self), fields(server = %self.server, group = %self.group, how_many = self.how_many))]
    async fn fetch_items(&self) -> Result<Vec<NewsItem>> {
        let mut session = self.connector.connect(&self.server).await?;

        let items = match self.collect_items(session.as_mut()).await {
            Ok(items) => items,
            Err(e) => {
                if let Err(quit_err) = session.quit().await {
                    warn!(error = %quit_err, "QUIT failed after retrieval error");
                }
                return Err(e);
            }
        };
        session.quit().await?;

        info!(count = items.len(), "Retrieved group postings");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NewsError;
    use crate::nntp::OverviewEntry;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// In-memory news server: article number -> (raw subject, raw body lines).
    #[derive(Default)]
    struct FakeServer {
        articles: BTreeMap<u64, (String, Vec<Vec<u8>>)>,
        failing_body: Option<u64>,
        failing_quit: bool,
        log: Mutex<Vec<String>>,
    }

    impl FakeServer {
        fn with_articles(numbers: impl IntoIterator<Item = u64>) -> Self {
            let articles = numbers
                .into_iter()
                .map(|n| {
                    let body = vec![format!("body of {n}").into_bytes(), b"-- ".to_vec()];
                    (n, (format!("Posting {n}"), body))
                })
                .collect();
            Self {
                articles,
                ..Default::default()
            }
        }

        fn log(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    struct FakeSession(Arc<FakeServer>);

    #[async_trait]
    impl GroupSession for FakeSession {
        async fn group(&mut self, name: &str) -> Result<GroupInfo> {
            self.0.log.lock().unwrap().push(format!("GROUP {name}"));
            let first = self.0.articles.keys().next().copied().unwrap_or(1);
            let last = self.0.articles.keys().last().copied().unwrap_or(0);
            Ok(GroupInfo {
                count: self.0.articles.len() as u64,
                first,
                last,
            })
        }

        async fn over(&mut self, first: u64, last: u64) -> Result<Vec<OverviewEntry>> {
            self.0.log.lock().unwrap().push(format!("OVER {first}-{last}"));
            Ok(self
                .0
                .articles
                .range(first..=last)
                .map(|(n, (subject, _))| OverviewEntry {
                    number: *n,
                    subject: subject.clone(),
                    author: String::new(),
                    date: String::new(),
                    message_id: format!("<{n}@fake>"),
                })
                .collect())
        }

        async fn body(&mut self, number: u64) -> Result<Vec<Vec<u8>>> {
            self.0.log.lock().unwrap().push(format!("BODY {number}"));
            if self.0.failing_body == Some(number) {
                return Err(NewsError::Protocol {
                    code: 430,
                    message: "No such article".into(),
                });
            }
            Ok(self.0.articles[&number].1.clone())
        }

        async fn quit(&mut self) -> Result<()> {
            self.0.log.lock().unwrap().push("QUIT".into());
            if self.0.failing_quit {
                return Err(NewsError::ConnectionClosed);
            }
            Ok(())
        }
    }

    #[derive(Clone)]
    struct FakeConnector(Arc<FakeServer>);

    #[async_trait]
    impl GroupConnector for FakeConnector {
        async fn connect(&self, _server: &str) -> Result<Box<dyn GroupSession>> {
            Ok(Box::new(FakeSession(Arc::clone(&self.0))))
        }
    }

    fn source(server: &Arc<FakeServer>, how_many: u64) -> NntpGroupSource<FakeConnector> {
        NntpGroupSource::new("news.example.com", "comp.lang.python.announce", how_many)
            .with_connector(FakeConnector(Arc::clone(server)))
    }

    #[test]
    fn test_window() {
        let src = NntpGroupSource::new("s", "g", 10);
        let info = GroupInfo {
            count: 500,
            first: 1,
            last: 500,
        };
        assert_eq!(src.window(&info), Some((491, 500)));

        let small = GroupInfo {
            count: 4,
            first: 1,
            last: 4,
        };
        assert_eq!(src.window(&small), Some((1, 4)));

        let huge = GroupInfo {
            count: 3,
            first: u64::MAX - 2,
            last: u64::MAX,
        };
        assert_eq!(src.window(&huge), Some((u64::MAX - 9, u64::MAX)));

        let empty = GroupInfo {
            count: 0,
            first: 1,
            last: 0,
        };
        assert_eq!(src.window(&empty), None);
        assert_eq!(NntpGroupSource::new("s", "g", 0).window(&info), None);
    }

    #[tokio::test]
    async fn test_fetches_most_recent_postings_in_order() {
        let server = Arc::new(FakeServer::with_articles(1..=20));
        let items = source(&server, 3).fetch_items().await.unwrap();

        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Posting 18", "Posting 19", "Posting 20"]);
        assert_eq!(items[0].body, "body of 18\n-- ");
        assert_eq!(
            server.log(),
            [
                "GROUP comp.lang.python.announce",
                "OVER 18-20",
                "BODY 18",
                "BODY 19",
                "BODY 20",
                "QUIT"
            ]
        );
    }

    #[tokio::test]
    async fn test_asking_for_more_than_exist_fabricates_nothing() {
        let server = Arc::new(FakeServer::with_articles(7..=10));
        let items = source(&server, 10).fetch_items().await.unwrap();

        assert_eq!(items.len(), 4);
        assert!(items.iter().all(|i| !i.title.is_empty()));
        assert_eq!(server.log()[1], "OVER 1-10");
    }

    #[tokio::test]
    async fn test_empty_group_still_quits() {
        let server = Arc::new(FakeServer::default());
        let items = source(&server, 10).fetch_items().await.unwrap();

        assert!(items.is_empty());
        assert_eq!(server.log(), ["GROUP comp.lang.python.announce", "QUIT"]);
    }

    #[tokio::test]
    async fn test_decodes_subject_and_latin1_body() {
        let mut server = FakeServer::default();
        server.articles.insert(
            1,
            (
                "=?ISO-8859-1?Q?Caf=E9_news?=".to_string(),
                vec![vec![b'n', 0xE4, b'h'], b"zweite".to_vec()],
            ),
        );
        let server = Arc::new(server);
        let items = source(&server, 5).fetch_items().await.unwrap();

        assert_eq!(items, vec![NewsItem::new("Café news", "näh\nzweite")]);
    }

    #[tokio::test]
    async fn test_body_failure_aborts_and_closes() {
        let mut server = FakeServer::with_articles(1..=3);
        server.failing_body = Some(2);
        let server = Arc::new(server);

        let err = source(&server, 3).fetch_items().await.unwrap_err();
        assert!(matches!(err, NewsError::Protocol { code: 430, .. }));

        let log = server.log();
        assert_eq!(log.last().map(String::as_str), Some("QUIT"));
        assert!(!log.contains(&"BODY 3".to_string()));
    }

    #[tokio::test]
    async fn test_quit_failure_after_error_keeps_original_error() {
        let mut server = FakeServer::with_articles(1..=3);
        server.failing_body = Some(1);
        server.failing_quit = true;
        let server = Arc::new(server);

        let err = source(&server, 3).fetch_items().await.unwrap_err();
        assert!(matches!(err, NewsError::Protocol { code: 430, .. }));
        assert_eq!(server.log().last().map(String::as_str), Some("QUIT"));
    }

    #[tokio::test]
    async fn test_quit_failure_after_success_is_an_error() {
        let mut server = FakeServer::with_articles(1..=2);
        server.failing_quit = true;
        let server = Arc::new(server);

        let err = source(&server, 2).fetch_items().await.unwrap_err();
        assert!(matches!(err, NewsError::ConnectionClosed));
    }

    #[test]
    fn test_name() {
        let src = NntpGroupSource::new("nntp.aioe.org", "comp.lang.python.announce", 10);
        assert_eq!(src.name(), "nntp://nntp.aioe.org/comp.lang.python.announce");
    }
}
