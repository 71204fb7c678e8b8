pub const NEWS_ISSUES_TABLE: &str = "news_issues";
pub const RELATED_INDUSTRIES_TABLE: &str = "related_industries";
pub const RELATED_PAST_ISSUES_TABLE: &str = "related_past_issues";
pub const PIPELINE_LOGS_TABLE: &str = "pipeline_logs";
pub const SIMULATION_RESULTS_TABLE: &str = "simulation_results";
pub const SCHEMA_VERSION: u32 = 1;

pub const CREATE_NEWS_ISSUES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS news_issues (\
    id INT PRIMARY KEY AUTO_INCREMENT,\
    issue_number INT,\
    title VARCHAR(500) NOT NULL,\
    content TEXT,\
    category VARCHAR(100),\
    extracted_at DATETIME,\
    stock_relevance_score DOUBLE,\
    ranking INT,\
    rag_confidence DOUBLE,\
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,\
    updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP ON UPDATE CURRENT_TIMESTAMP\
) ENGINE=InnoDB CHARSET=utf8mb4";

pub const CREATE_RELATED_INDUSTRIES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS related_industries (\
    id INT PRIMARY KEY AUTO_INCREMENT,\
    news_issue_id INT NOT NULL,\
    industry_name VARCHAR(200),\
    final_score DOUBLE,\
    ai_reason TEXT,\
    FOREIGN KEY (news_issue_id) REFERENCES news_issues(id) ON DELETE CASCADE\
) ENGINE=InnoDB CHARSET=utf8mb4";

pub const CREATE_RELATED_PAST_ISSUES_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS related_past_issues (\
    id INT PRIMARY KEY AUTO_INCREMENT,\
    news_issue_id INT NOT NULL,\
    issue_name VARCHAR(200),\
    final_score DOUBLE,\
    period VARCHAR(100),\
    ai_reason TEXT,\
    FOREIGN KEY (news_issue_id) REFERENCES news_issues(id) ON DELETE CASCADE\
) ENGINE=InnoDB CHARSET=utf8mb4";

pub const CREATE_PIPELINE_LOGS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS pipeline_logs (\
    id INT PRIMARY KEY AUTO_INCREMENT,\
    pipeline_id VARCHAR(50),\
    started_at DATETIME,\
    completed_at DATETIME,\
    final_status VARCHAR(20),\
    total_crawled INT,\
    selected_count INT,\
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\
) ENGINE=InnoDB CHARSET=utf8mb4";

pub const CREATE_SIMULATION_RESULTS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS simulation_results (\
    id INT PRIMARY KEY AUTO_INCREMENT,\
    issue_name VARCHAR(200),\
    total_investment BIGINT,\
    total_final_value DOUBLE,\
    total_profit_loss DOUBLE,\
    prediction_accuracy DOUBLE,\
    created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP\
) ENGINE=InnoDB CHARSET=utf8mb4";

// Order matters: child tables reference news_issues.
pub const MIGRATION_STATEMENTS_SQL: [&str; 5] = [
    CREATE_NEWS_ISSUES_TABLE_SQL,
    CREATE_RELATED_INDUSTRIES_TABLE_SQL,
    CREATE_RELATED_PAST_ISSUES_TABLE_SQL,
    CREATE_PIPELINE_LOGS_TABLE_SQL,
    CREATE_SIMULATION_RESULTS_TABLE_SQL,
];
