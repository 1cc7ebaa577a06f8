use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;

use crate::error::AppError;
use crate::read_through::read_through;
use crate::state::AppState;
use crate::types::MarketNewsItem;
use finnhub_client::NewsArticle;

/// Articles returned per request; the provider sends far more
const NEWS_LIMIT: usize = 20;

/// Company news lookback window in days
const COMPANY_NEWS_DAYS: i64 = 30;

#[derive(Deserialize)]
pub struct NewsParams {
    category: Option<String>,
}

/// Market-wide news for a category, cached per category with stale fallback
pub async fn get_market_news(
    State(state): State<AppState>,
    Query(params): Query<NewsParams>,
) -> Result<Json<Vec<MarketNewsItem>>, AppError> {
    let category = params.category.unwrap_or_else(|| "general".to_string());
    let key = format!("news:{}", category);

    let finnhub = state.finnhub.clone();
    let (items, _stale) = read_through(&state.news_cache, &state.flights, &key, move || {
        async move {
            let articles = finnhub.market_news(&category).await?;
            Ok(articles
                .iter()
                .take(NEWS_LIMIT)
                .map(|a| news_item(a, &category, None))
                .collect())
        }
    })
    .await?;

    Ok(Json(items))
}

/// Company news for one ticker over the last 30 days
pub async fn get_company_news(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
) -> Result<Json<Vec<MarketNewsItem>>, AppError> {
    let ticker = ticker.trim().to_uppercase();
    if ticker.is_empty() {
        return Err(AppError::BadRequest("ticker is required".into()));
    }
    let key = format!("news:{}", ticker);

    let finnhub = state.finnhub.clone();
    let (items, _stale) = read_through(&state.news_cache, &state.flights, &key, move || {
        async move {
            let to = Utc::now();
            let from = to - Duration::days(COMPANY_NEWS_DAYS);
            let articles = finnhub
                .company_news(
                    &ticker,
                    &from.format("%Y-%m-%d").to_string(),
                    &to.format("%Y-%m-%d").to_string(),
                )
                .await?;
            Ok(articles
                .iter()
                .take(NEWS_LIMIT)
                .map(|a| news_item(a, "company", Some(ticker.clone())))
                .collect())
        }
    })
    .await?;

    Ok(Json(items))
}

fn news_item(article: &NewsArticle, category: &str, ticker: Option<String>) -> MarketNewsItem {
    let id = article
        .id
        .or(article.datetime)
        .map(|n| n.to_string())
        .unwrap_or_default();
    let published_at = article
        .datetime
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .unwrap_or_default();

    MarketNewsItem {
        id,
        headline: article.headline.clone().unwrap_or_default(),
        summary: article.summary.clone().unwrap_or_default(),
        source: article.source.clone().unwrap_or_default(),
        published_at,
        category: category.to_string(),
        sentiment: "neutral".to_string(),
        tickers: ticker.map(|t| vec![t]),
        url: article.url.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_news_item_mapping() {
        let article = NewsArticle {
            id: Some(7411837),
            datetime: Some(1596589501),
            headline: Some("Markets rally".into()),
            summary: Some("Stocks rose".into()),
            source: Some("CNBC".into()),
            url: Some("https://example.com/a".into()),
            ..Default::default()
        };
        let item = news_item(&article, "general", None);
        assert_eq!(item.id, "7411837");
        assert_eq!(item.published_at, "2020-08-05T01:05:01");
        assert_eq!(item.category, "general");
        assert_eq!(item.sentiment, "neutral");
        assert!(item.tickers.is_none());
    }

    #[test]
    fn test_news_item_falls_back_to_datetime_id() {
        let article = NewsArticle {
            datetime: Some(1596589501),
            ..Default::default()
        };
        let item = news_item(&article, "general", None);
        assert_eq!(item.id, "1596589501");
        assert_eq!(item.headline, "");
    }

    #[test]
    fn test_company_news_item_carries_ticker() {
        let article = NewsArticle::default();
        let item = news_item(&article, "company", Some("AAPL".into()));
        assert_eq!(item.tickers, Some(vec!["AAPL".to_string()]));
        assert_eq!(item.category, "company");
    }
}
