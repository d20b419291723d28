use crate::models::SavedQueryInfo;

/// A predefined analytical query, run against the full dataset.
#[derive(Debug, Clone, Copy)]
pub struct SavedQuery {
    pub id: u32,
    pub title: &'static str,
    pub sql: &'static str,
}

impl SavedQuery {
    pub fn info(&self) -> SavedQueryInfo {
        SavedQueryInfo {
            id: self.id,
            title: self.title,
        }
    }
}

pub fn all() -> &'static [SavedQuery] {
    &SAVED_QUERIES
}

pub fn find(id: u32) -> Option<&'static SavedQuery> {
    SAVED_QUERIES.iter().find(|q| q.id == id)
}

// SQL is kept exactly as analysts wrote it, including the entries that the
// engine rejects (20 reads `df_stock`, 27/30 use backtick identifiers,
// 29 carries a second ORDER BY statement, 8 compares against '2025-04-31').
static SAVED_QUERIES: [SavedQuery; 30] = [
    SavedQuery {
        id: 1,
        title: "Top 3 cryptocurrencies by market cap",
        sql: r#"
            SELECT name, market_cap, current_price FROM cryptocurrencies ORDER BY market_cap DESC LIMIT 3
        "#,
    },
    SavedQuery {
        id: 2,
        title: "Coins with > 90% circulating supply",
        sql: r#"
            SELECT name, circulating_supply, total_supply,
            (circulating_supply / total_supply) * 100 AS supply_percentage
            FROM cryptocurrencies
            WHERE (circulating_supply / total_supply) > 0.9
            ORDER BY supply_percentage DESC
        "#,
    },
    SavedQuery {
        id: 3,
        title: "Coins within 10% of their ATH",
        sql: r#"
            SELECT name, current_price, ath,
            ((current_price / ath) * 100) AS percent_of_ath
            FROM cryptocurrencies
            WHERE current_price >= (ath * 0.9)
            ORDER BY percent_of_ath DESC
        "#,
    },
    SavedQuery {
        id: 4,
        title: "The average rank for high volume coins",
        sql: r#"
            SELECT
            AVG("rank") as average_rank,  -- Use double quotes here
            COUNT(*)  as coin_count
            FROM cryptocurrencies
            WHERE total_volume > 1000000000
        "#,
    },
    SavedQuery {
        id: 5,
        title: "The single most recently updated record",
        sql: r#"
            SELECT * FROM cryptocurrencies
            ORDER BY last_updated DESC
            LIMIT 1
        "#,
    },
    SavedQuery {
        id: 6,
        title: "Average Daily Price for Ethereum",
        sql: r#"
            SELECT
            coin_id,
            "date",
            price_usd
            FROM historical_Prices
            where coin_id = 'bitcoin'
            ORDER BY date DESC LIMIT 1
        "#,
    },
    SavedQuery {
        id: 7,
        title: "Average value for each day",
        sql: r#"
            SELECT
            coin_id,
            "date",
            AVG(price_usd) as average_daily_price
            FROM historical_Prices
            WHERE coin_id = 'ethereum' AND "date" >= current_date - INTERVAL 1 YEAR
            GROUP BY "date", coin_id
            ORDER BY "date" DESC
        "#,
    },
    SavedQuery {
        id: 8,
        title: "Daily price trend of Bitcoin in April 2025",
        sql: r#"
            SELECT
             coin_id,
             AVG(price_usd) as avg_price,
             MIN(price_usd) as min_price,
             MAX(price_usd) as max_price
             FROM historical_Prices
             WHERE coin_id = 'bitcoin'
             AND "date" >= '2025-04-01'
             AND "date" <= '2025-04-31'
            GROUP BY coin_id
        "#,
    },
    SavedQuery {
        id: 9,
        title: "Coin with the highest average price",
        sql: r#"
            SELECT coin_id,
            AVG(price_usd) AS avg_price
            FROM historical_Prices
            WHERE "date" >= current_date - INTERVAL 1 YEAR
            GROUP BY coin_id
            ORDER BY avg_price DESC
            LIMIT 1
        "#,
    },
    SavedQuery {
        id: 10,
        title: "% change in Bitcoin’s price",
        sql: r#"
            SELECT "date", price_usd
            FROM historical_Prices
            WHERE coin_id = 'bitcoin'
            AND CAST("date" AS VARCHAR) LIKE '2025-09-%'
            OR CAST("date" AS VARCHAR) LIKE '2025-09-%'
            ORDER BY "date" ASC
        "#,
    },
    SavedQuery {
        id: 11,
        title: "Highest oil price",
        sql: r#"
            SELECT "date", "Price"
            FROM oil_prices
            ORDER BY "Price" DESC
            LIMIT 1
        "#,
    },
    SavedQuery {
        id: 12,
        title: "Group data by year",
        sql: r#"
            SELECT
            YEAR("date") AS oil_year,
            AVG("Price") AS avg_price
            FROM oil_prices
            GROUP BY oil_year
            ORDER BY oil_year DESC
        "#,
    },
    SavedQuery {
        id: 13,
        title: "Oil prices during COVID crash",
        sql: r#"
            SELECT
            "date",
            "Price"
            FROM oil_prices
            WHERE CAST("date" AS VARCHAR) LIKE '2020-03-%'
            OR CAST("date" AS VARCHAR) LIKE '2020-04-%'
            ORDER BY "date" DESC
        "#,
    },
    SavedQuery {
        id: 14,
        title: "Lowest price of oil",
        sql: r#"
            SELECT
              "date", "Price"
               FROM oil_prices
               ORDER BY "Price" ASC
            LIMIT 1
        "#,
    },
    SavedQuery {
        id: 15,
        title: "Volatility of oil prices",
        sql: r#"
            SELECT
            YEAR("date") AS oil_year,
            MIN("Price") AS min_price,
            MAX("Price") AS max_price,
            (MAX("Price") - MIN("Price")) AS price_spread
            FROM oil_prices
            GROUP BY oil_year
            ORDER BY oil_year DESC
        "#,
    },
    SavedQuery {
        id: 16,
        title: "Highest NASDAQ (^IXIC) Overall",
        sql: r#"
            SELECT Date, Ticker, Close
            FROM stock_prices
            WHERE Ticker = '^IXIC'
            ORDER BY Close DESC
            LIMIT 1
        "#,
    },
    SavedQuery {
        id: 17,
        title: "Get all stock prices",
        sql: r#"
            SELECT * FROM stock_prices
        "#,
    },
    SavedQuery {
        id: 18,
        title: "Top 5 Volatile Days (GSPC)",
        sql: r#"
            SELECT Date, Ticker, (High - Low) AS Difference
            FROM stock_prices
            WHERE Ticker = '^GSPC'
            ORDER BY Difference DESC
            LIMIT 5
        "#,
    },
    SavedQuery {
        id: 19,
        title: "Get monthly average closing price for each ticker",
        sql: r#"
            SELECT
            strftime(Date, '%Y-%m') AS Month,
            Ticker,
            AVG(Close) AS Avg_close
            FROM stock_prices
            GROUP BY Month, Ticker
            ORDER BY Month DESC
        "#,
    },
    SavedQuery {
        id: 20,
        title: "Avg volume for NSEI",
        sql: r#"
            SELECT
            Ticker,
            AVG(Volume) AS Avg_Volume
            FROM df_stock
            WHERE Ticker = '^NSEI'
            GROUP BY Ticker
        "#,
    },
    SavedQuery {
        id: 21,
        title: "Compare Bitcoin vs Oil average",
        sql: r#"
            SELECT
            AVG(h.price_usd) AS btc_avg,
            AVG(o.price) AS oil_avg
            FROM historical_Prices h
            LEFT JOIN oil_prices o ON h.date = o.date
            WHERE h.coin_id = 'bitcoin'
            AND h.date >= '2025-01-01'
            AND h.date <= '2025-12-31';
        "#,
    },
    SavedQuery {
        id: 22,
        title: "Bitcoin moves with S&P 500",
        sql: r#"
            SELECT
            CAST(btc.date AS DATE) AS "Date",
            btc.price_usd AS btc_price,
            sp.close AS sp500_close
            FROM historical_Prices btc
            INNER JOIN stock_prices sp ON btc.date = sp.date
            WHERE btc.coin_id = 'bitcoin'
            AND sp.ticker = 'GSPC'
            AND btc.date >= '2024-01-01'
            ORDER BY btc.date ASC
        "#,
    },
    SavedQuery {
        id: 23,
        title: "Ethereum and NASDAQ daily prices",
        sql: r#"
            SELECT
            c.date,
            c.price_usd AS ethereum_price,
            s.close AS nasdaq_close
            FROM historical_Prices c
            JOIN stock_prices s ON c.date = s.date
            WHERE c.coin_id = 'ethereum'
            AND s.ticker = 'IXIC'
            AND YEAR(c.date) = 2025
            ORDER BY c.date;
        "#,
    },
    SavedQuery {
        id: 24,
        title: "Oil price spiked and compare with Bitcoin price change",
        sql: r#"
            WITH OilChanges AS (
            SELECT
            "date",
            Price,
            LAG(Price) OVER (ORDER BY "date") AS prev_oil_price,
            ((Price - LAG(Price) OVER (ORDER BY "date")) / LAG(Price) OVER (ORDER BY "date")) * 100 AS oil_pct_change
            FROM oil_prices
            ),
            BTCChanges AS (
            SELECT
            "date",
            price_usd,
            ((price_usd - LAG(price_usd) OVER (ORDER BY "date")) / LAG(price_usd) OVER (ORDER BY "date")) * 100 AS btc_pct_change
            FROM historical_Prices
            WHERE coin_id = 'bitcoin'
            )
            SELECT
            o."date",
            o.oil_pct_change AS oil_spike_pct,
            b.btc_pct_change AS btc_response_pct
            FROM OilChanges o
            JOIN BTCChanges b ON o."date" = b."date"
            WHERE o.oil_pct_change > 5
            ORDER BY o.oil_pct_change DESC;
        "#,
    },
    SavedQuery {
        id: 25,
        title: "Top 3 coins daily price trend vs Nifty",
        sql: r#"
            SELECT
            h.date,
            h.coin_id,
            h.price_usd AS crypto_price,
            o.Price AS oil_price,
            s.Close AS nifty_price
            FROM historical_Prices h
            LEFT JOIN oil_prices o ON h.date = o.date
            LEFT JOIN stock_prices s ON h.date = s.date AND s.Ticker = 'NSEI'
            WHERE h.coin_id IN ('bitcoin', 'ethereum', 'tether')
            ORDER BY h.date ASC;
        "#,
    },
    SavedQuery {
        id: 26,
        title: "Stock prices (^GSPC) with crude oil prices",
        sql: r#"
            SELECT
            h."date",
            h.price_usd AS btc_price,
            o.Price AS oil_price
            FROM historical_Prices h
            JOIN oil_prices o ON h."date" = o."date"
            WHERE h.coin_id = 'bitcoin'
            ORDER BY h."date" ASC;
        "#,
    },
    SavedQuery {
        id: 27,
        title: "Bitcoin closing price with crude oil closing price",
        sql: r#"
            SELECT
            h."date",
            h.price_usd AS btc_price,
            o.Price AS oil_price
            FROM historical_Prices h
            JOIN oil_prices o ON h."date" = o."date"
            WHERE h.coin_id = 'bitcoin'
            ORDER BY h.`date` ASC;
        "#,
    },
    SavedQuery {
        id: 28,
        title: "NASDAQ IXIC with Ethereum price trends",
        sql: r#"
            SELECT
            s."date",
            s.Close AS nasdaq_close,
            h.price_usd AS eth_price,
            ((s.Close - LAG(s.Close) OVER (ORDER BY s."date")) / LAG(s.Close) OVER (ORDER BY s."date")) * 100 AS nasdaq_pct_change,
            ((h.price_usd - LAG(h.price_usd) OVER (ORDER BY h."date")) / LAG(h.price_usd) OVER (ORDER BY h."date")) * 100 AS eth_pct_change
            FROM stock_prices s
            JOIN historical_Prices h ON s."date" = h."date"
            WHERE s.Ticker = 'IXIC' AND h.coin_id = 'ethereum'
            ORDER BY s."date" ASC;
        "#,
    },
    SavedQuery {
        id: 29,
        title: "Top 3 crypto coins with stock indices",
        sql: r#"
            SELECT
            h."date",
            h.coin_id,
            h.price_usd AS crypto_price,
            s_nasdaq.Close AS nasdaq_close,
            s_sp500.Close AS sp500_close
            FROM historical_Prices h

            LEFT JOIN stock_prices s_nasdaq
            ON h."date" = s_nasdaq."date" AND s_nasdaq.Ticker = 'IXIC'

            LEFT JOIN stock_prices s_sp500
            ON h."date" = s_sp500.`date` AND s_sp500.Ticker = 'GSPC'
            WHERE h.coin_id IN ('bitcoin', 'ethereum', 'tether')
            AND h."date" BETWEEN '2025-01-01' AND '2025-12-31'
            ORDER BY h."date" ASC, h.coin_id;
            ORDER BY s."date" ASC;
        "#,
    },
    SavedQuery {
        id: 30,
        title: "Multi-join: stock prices, oil prices, and Bitcoin prices",
        sql: r#"
            SELECT
                    h."date",
                    h.price_usd AS btc_price,
                    s.Close AS sp500_close,
                    o.Price AS oil_price,
            -- Calculate Daily % Change for BTC to see correlation in volatility
                    ((h.price_usd - LAG(h.price_usd) OVER (PARTITION BY h.coin_id ORDER BY h."date"))
                    / LAG(h.price_usd) OVER (PARTITION BY h.coin_id ORDER BY h."date")) * 100 AS btc_daily_return
                    FROM historical_Prices h
                    LEFT JOIN stock_prices s
                    ON h."date"` = s."date" AND s.Ticker = 'GSPC'
                    LEFT JOIN oil_prices o
                    ON h."date" = o."date"
                    WHERE h.coin_id = 'bitcoin'
                    AND h."date" BETWEEN '2025-01-01' AND '2025-12-31'
                    ORDER BY h."date" ASC;
        "#,
    },
];
