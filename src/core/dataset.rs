// ComboStats - core/dataset.rs
//
// Catalogue of the three dashboard datasets: their fixed queries,
// declared column types, ranking columns, and chart columns.
//
// The three result sets are related only through the shared `combo` and
// `nb_joueurs` columns, which drive cross-filtering.

use crate::core::model::{ColumnType, Table};

/// Combination identifier, shared by every dataset.
pub const COL_COMBO: &str = "combo";
/// Player count, shared by every dataset.
pub const COL_PLAYERS: &str = "nb_joueurs";
pub const COL_MATCHES: &str = "matches";
pub const COL_WINS: &str = "victoires";
pub const COL_LOSSES: &str = "defaites";
pub const COL_WIN_RATE: &str = "taux_victoire";
pub const COL_SERIES_TYPE: &str = "type_serie";
pub const COL_LENGTH: &str = "longueur";
pub const COL_START: &str = "date_debut";
pub const COL_END: &str = "date_fin";
pub const COL_IN_PROGRESS: &str = "en_cours";
pub const COL_OPPONENT: &str = "combo_adverse";

/// `type_serie` value of a winning streak.
pub const SERIES_WINS: &str = "victoires";
/// `type_serie` value of a losing streak.
pub const SERIES_LOSSES: &str = "defaites";

const STATS_QUERY: &str = "
    SELECT combo,
           nb_joueurs,
           COUNT(*) AS matches,
           SUM(CASE WHEN victoire THEN 1 ELSE 0 END) AS victoires,
           SUM(CASE WHEN victoire THEN 0 ELSE 1 END) AS defaites,
           ROUND(100.0 * SUM(CASE WHEN victoire THEN 1 ELSE 0 END) / COUNT(*), 1) AS taux_victoire
      FROM participations
     GROUP BY combo, nb_joueurs
     ORDER BY combo, nb_joueurs";

const SERIES_QUERY: &str = "
    SELECT combo,
           nb_joueurs,
           type_serie,
           longueur,
           date_debut,
           date_fin,
           en_cours
      FROM series
     ORDER BY combo, nb_joueurs, date_debut";

// The head-to-head aggregation is read as published by the database view.
// Its pairing logic is known to be questionable upstream and is not
// reinterpreted here.
const CONFRONTATIONS_QUERY: &str = "
    SELECT combo,
           nb_joueurs,
           combo_adverse,
           matches,
           victoires,
           ROUND(100.0 * victoires / NULLIF(matches, 0), 1) AS taux_victoire
      FROM confrontations
     ORDER BY combo, nb_joueurs, combo_adverse";

/// The datasets shown by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatasetKind {
    Stats,
    Series,
    Confrontations,
}

impl DatasetKind {
    /// All datasets in tab order.
    pub fn all() -> &'static [DatasetKind] {
        &[
            DatasetKind::Stats,
            DatasetKind::Series,
            DatasetKind::Confrontations,
        ]
    }

    /// Stable identifier used in logs, session keys, and file names.
    pub fn id(&self) -> &'static str {
        match self {
            DatasetKind::Stats => "stats",
            DatasetKind::Series => "series",
            DatasetKind::Confrontations => "confrontations",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            DatasetKind::Stats => "Combo statistics",
            DatasetKind::Series => "Win / loss series",
            DatasetKind::Confrontations => "Head-to-head",
        }
    }

    /// The fixed read-only query for this dataset.
    pub fn query(&self) -> &'static str {
        match self {
            DatasetKind::Stats => STATS_QUERY,
            DatasetKind::Series => SERIES_QUERY,
            DatasetKind::Confrontations => CONFRONTATIONS_QUERY,
        }
    }

    /// Declared column types. Query columns not listed here load as text.
    pub fn columns(&self) -> &'static [(&'static str, ColumnType)] {
        match self {
            DatasetKind::Stats => &[
                (COL_COMBO, ColumnType::Text),
                (COL_PLAYERS, ColumnType::Integer),
                (COL_MATCHES, ColumnType::Integer),
                (COL_WINS, ColumnType::Integer),
                (COL_LOSSES, ColumnType::Integer),
                (COL_WIN_RATE, ColumnType::Float),
            ],
            DatasetKind::Series => &[
                (COL_COMBO, ColumnType::Text),
                (COL_PLAYERS, ColumnType::Integer),
                (COL_SERIES_TYPE, ColumnType::Text),
                (COL_LENGTH, ColumnType::Integer),
                (COL_START, ColumnType::Date),
                (COL_END, ColumnType::Date),
                (COL_IN_PROGRESS, ColumnType::Boolean),
            ],
            DatasetKind::Confrontations => &[
                (COL_COMBO, ColumnType::Text),
                (COL_PLAYERS, ColumnType::Integer),
                (COL_OPPONENT, ColumnType::Text),
                (COL_MATCHES, ColumnType::Integer),
                (COL_WINS, ColumnType::Integer),
                (COL_WIN_RATE, ColumnType::Float),
            ],
        }
    }

    /// Declared type of `column`, or `Text` for undeclared columns.
    pub fn column_type(&self, column: &str) -> ColumnType {
        self.columns()
            .iter()
            .find(|(name, _)| *name == column)
            .map_or(ColumnType::Text, |(_, ty)| *ty)
    }

    /// Columns the table can be ranked by, default first.
    pub fn ranking_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Stats => &[COL_WINS, COL_WIN_RATE, COL_MATCHES],
            DatasetKind::Series => &[COL_LENGTH],
            DatasetKind::Confrontations => &[COL_MATCHES, COL_WINS, COL_WIN_RATE],
        }
    }

    pub fn default_ranking(&self) -> &'static str {
        self.ranking_columns()[0]
    }

    /// Column used to label chart bars.
    pub fn chart_label_column(&self) -> &'static str {
        match self {
            DatasetKind::Confrontations => COL_OPPONENT,
            DatasetKind::Stats | DatasetKind::Series => COL_COMBO,
        }
    }

    /// Numeric columns offered as range sliders.
    pub fn range_columns(&self) -> &'static [&'static str] {
        match self {
            DatasetKind::Stats => &[COL_MATCHES, COL_WIN_RATE],
            DatasetKind::Series => &[COL_LENGTH, COL_START],
            DatasetKind::Confrontations => &[COL_MATCHES, COL_WIN_RATE],
        }
    }
}

/// The three loaded tables of one load cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub stats: Table,
    pub series: Table,
    pub confrontations: Table,
}

impl Datasets {
    pub fn get(&self, kind: DatasetKind) -> &Table {
        match kind {
            DatasetKind::Stats => &self.stats,
            DatasetKind::Series => &self.series,
            DatasetKind::Confrontations => &self.confrontations,
        }
    }

    pub fn set(&mut self, kind: DatasetKind, table: Table) {
        match kind {
            DatasetKind::Stats => self.stats = table,
            DatasetKind::Series => self.series = table,
            DatasetKind::Confrontations => self.confrontations = table,
        }
    }

    pub fn total_rows(&self) -> usize {
        DatasetKind::all().iter().map(|k| self.get(*k).len()).sum()
    }
}
