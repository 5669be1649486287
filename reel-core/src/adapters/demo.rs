//! Offline demo catalog
//!
//! Serves a fixed set of well-known titles so the app works without a TMDB
//! API key. Ids match TMDB, so favorites saved in demo mode still resolve
//! once a real key is configured. Upcoming titles are fictional and dated
//! relative to today.

use chrono::{Duration, Utc};

use crate::domain::result::{Error, Result};
use crate::domain::{Genre, Movie, MovieDetails, MovieId, MoviePage};
use crate::ports::CatalogProvider;

const PAGE_SIZE: usize = 20;

/// How many of the most recent releases count as "in theatres"
const NOW_PLAYING_COUNT: usize = 8;

/// (id, title, release date, vote average, popularity, genre ids, runtime, overview)
type DemoEntry = (
    MovieId,
    &'static str,
    &'static str,
    f64,
    f64,
    &'static [i64],
    u32,
    &'static str,
);

const RELEASED: &[DemoEntry] = &[
    (278, "The Shawshank Redemption", "1994-09-23", 8.7, 120.0, &[18, 80], 142,
     "Two imprisoned men bond over a number of years."),
    (238, "The Godfather", "1972-03-14", 8.7, 110.0, &[18, 80], 175,
     "The aging patriarch of a crime dynasty hands control to his reluctant son."),
    (155, "The Dark Knight", "2008-07-16", 8.5, 150.0, &[18, 28, 80, 53], 152,
     "Batman faces the Joker, a criminal mastermind who thrives on chaos."),
    (680, "Pulp Fiction", "1994-09-10", 8.5, 90.0, &[53, 80], 154,
     "Interlocking stories of Los Angeles criminals."),
    (550, "Fight Club", "1999-10-15", 8.4, 95.0, &[18], 139,
     "An insomniac office worker forms an underground fight club."),
    (13, "Forrest Gump", "1994-06-23", 8.5, 85.0, &[35, 18, 10749], 142,
     "A slow-witted but kind man witnesses decades of American history."),
    (27205, "Inception", "2010-07-15", 8.4, 130.0, &[28, 878, 12], 148,
     "A thief who steals secrets through dreams is asked to plant one."),
    (157336, "Interstellar", "2014-11-05", 8.4, 160.0, &[12, 18, 878], 169,
     "Explorers travel through a wormhole in search of a new home for humanity."),
    (603, "The Matrix", "1999-03-30", 8.2, 100.0, &[28, 878], 136,
     "A hacker learns the world he knows is a simulation."),
    (129, "Spirited Away", "2001-07-20", 8.5, 80.0, &[16, 10751, 14], 125,
     "A girl wanders into a world ruled by gods and spirits."),
    (496243, "Parasite", "2019-05-30", 8.5, 75.0, &[35, 53, 18], 133,
     "A poor family schemes its way into a wealthy household."),
    (120, "The Lord of the Rings: The Fellowship of the Ring", "2001-12-18", 8.4, 105.0,
     &[12, 14, 28], 179,
     "A hobbit sets out to destroy a ring of terrible power."),
    (424, "Schindler's List", "1993-12-15", 8.6, 60.0, &[18, 36, 10752], 195,
     "A businessman saves the lives of more than a thousand refugees."),
    (769, "GoodFellas", "1990-09-12", 8.5, 55.0, &[18, 80], 145,
     "The rise and fall of a mob associate."),
    (105, "Back to the Future", "1985-07-03", 8.3, 70.0, &[12, 35, 878], 116,
     "A teenager is sent thirty years into the past in a time-traveling car."),
    (11, "Star Wars", "1977-05-25", 8.2, 88.0, &[12, 28, 878], 121,
     "A farm boy joins a rebellion against a galactic empire."),
    (329, "Jurassic Park", "1993-06-11", 7.9, 92.0, &[12, 878], 127,
     "Cloned dinosaurs escape in an island theme park."),
    (597, "Titanic", "1997-11-18", 7.9, 98.0, &[18, 10749], 194,
     "Two passengers from different worlds fall in love aboard a doomed ship."),
    (862, "Toy Story", "1995-10-30", 8.0, 78.0, &[16, 12, 10751, 35], 81,
     "A cowboy doll feels threatened by a new spaceman toy."),
    (389, "12 Angry Men", "1957-04-10", 8.5, 40.0, &[18], 97,
     "A juror pushes his peers to reconsider a murder verdict."),
    (872585, "Oppenheimer", "2023-07-19", 8.1, 170.0, &[18, 36], 181,
     "The story of the physicist behind the atomic bomb."),
    (693134, "Dune: Part Two", "2024-02-27", 8.2, 180.0, &[878, 12], 167,
     "Paul Atreides unites with the Fremen to seek revenge."),
    (569094, "Spider-Man: Across the Spider-Verse", "2023-05-31", 8.4, 140.0,
     &[16, 28, 12, 878], 140,
     "Miles Morales is catapulted across the multiverse."),
    (346698, "Barbie", "2023-07-19", 7.0, 135.0, &[35, 12], 114,
     "Barbie leaves Barbieland for the real world."),
    (1022789, "Inside Out 2", "2024-06-11", 7.6, 165.0, &[16, 10751, 12, 35], 97,
     "New emotions move into a teenager's mind."),
];

/// (id, title, days from today, genre ids, runtime, overview)
const UPCOMING: &[(MovieId, &str, i64, &[i64], u32, &str)] = &[
    (9_000_001, "The Last Lighthouse", 14, &[18, 9648], 118,
     "A keeper on a remote island receives signals from a ship that sank a century ago."),
    (9_000_002, "Midnight Orbit", 35, &[878, 53], 124,
     "A lone engineer must restart a failing space station before dawn."),
    (9_000_003, "Paper Kingdoms", 63, &[16, 10751, 14], 96,
     "Two siblings fold their way into a world made of origami."),
    (9_000_004, "Salt and Thunder", 90, &[12, 28], 131,
     "A smuggler crew races a storm across the northern sea."),
];

const GENRES: &[(i64, &str)] = &[
    (28, "Action"),
    (12, "Adventure"),
    (16, "Animation"),
    (35, "Comedy"),
    (80, "Crime"),
    (18, "Drama"),
    (10751, "Family"),
    (14, "Fantasy"),
    (36, "History"),
    (27, "Horror"),
    (9648, "Mystery"),
    (10749, "Romance"),
    (878, "Science Fiction"),
    (53, "Thriller"),
    (10752, "War"),
];

fn genre_name(id: i64) -> Option<&'static str> {
    GENRES.iter().find(|(gid, _)| *gid == id).map(|(_, name)| *name)
}

fn released_movie(entry: &DemoEntry) -> Movie {
    let (id, title, release_date, vote_average, popularity, genre_ids, _, overview) = *entry;
    let mut movie = Movie::new(id, title);
    movie.release_date = release_date.to_string();
    movie.vote_average = vote_average;
    movie.vote_count = (popularity * 100.0) as u64;
    movie.popularity = popularity;
    movie.genre_ids = genre_ids.to_vec();
    movie.overview = overview.to_string();
    movie.original_language = "en".to_string();
    movie
}

fn upcoming_movie(entry: &(MovieId, &str, i64, &[i64], u32, &str)) -> Movie {
    let (id, title, days, genre_ids, _, overview) = *entry;
    let release = Utc::now().date_naive() + Duration::days(days);
    let mut movie = Movie::new(id, title);
    movie.release_date = release.format("%Y-%m-%d").to_string();
    movie.genre_ids = genre_ids.to_vec();
    movie.overview = overview.to_string();
    movie.original_language = "en".to_string();
    movie
}

/// Slice a full result list into one page
fn paginate(mut movies: Vec<Movie>, page: u32) -> MoviePage {
    let total_results = movies.len() as u64;
    let total_pages = movies.len().div_ceil(PAGE_SIZE) as u32;
    let start = (page.max(1) as usize - 1) * PAGE_SIZE;
    let results = if start < movies.len() {
        movies.drain(start..).take(PAGE_SIZE).collect()
    } else {
        Vec::new()
    };
    MoviePage {
        page,
        results,
        total_pages,
        total_results,
    }
}

/// Demo catalog provider
#[derive(Debug, Default)]
pub struct DemoCatalog;

impl DemoCatalog {
    pub fn new() -> Self {
        Self
    }

    fn released(&self) -> Vec<Movie> {
        RELEASED.iter().map(released_movie).collect()
    }

    fn upcoming_movies(&self) -> Vec<Movie> {
        UPCOMING.iter().map(upcoming_movie).collect()
    }

    fn sorted_by<F>(&self, page: u32, mut key: F) -> MoviePage
    where
        F: FnMut(&Movie, &Movie) -> std::cmp::Ordering,
    {
        let mut movies = self.released();
        movies.sort_by(|a, b| key(a, b));
        paginate(movies, page)
    }
}

impl CatalogProvider for DemoCatalog {
    fn name(&self) -> &str {
        "demo"
    }

    fn popular(&self, page: u32) -> Result<MoviePage> {
        Ok(self.sorted_by(page, |a, b| b.popularity.total_cmp(&a.popularity)))
    }

    fn top_rated(&self, page: u32) -> Result<MoviePage> {
        Ok(self.sorted_by(page, |a, b| b.vote_average.total_cmp(&a.vote_average)))
    }

    fn now_playing(&self, page: u32) -> Result<MoviePage> {
        // ISO dates sort chronologically as strings
        let mut movies = self.released();
        movies.sort_by(|a, b| b.release_date.cmp(&a.release_date));
        movies.truncate(NOW_PLAYING_COUNT);
        Ok(paginate(movies, page))
    }

    fn upcoming(&self, page: u32) -> Result<MoviePage> {
        Ok(paginate(self.upcoming_movies(), page))
    }

    fn search(&self, query: &str, page: u32) -> Result<MoviePage> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return Ok(MoviePage::empty(page));
        }
        let matches: Vec<Movie> = self
            .released()
            .into_iter()
            .chain(self.upcoming_movies())
            .filter(|m| m.title.to_lowercase().contains(&needle))
            .collect();
        Ok(paginate(matches, page))
    }

    fn details(&self, movie_id: MovieId) -> Result<MovieDetails> {
        let (movie, runtime, status) = if let Some(entry) =
            RELEASED.iter().find(|e| e.0 == movie_id)
        {
            (released_movie(entry), entry.6, "Released")
        } else if let Some(entry) = UPCOMING.iter().find(|e| e.0 == movie_id) {
            (upcoming_movie(entry), entry.4, "Post Production")
        } else {
            return Err(Error::catalog(format!("Movie {} not found", movie_id)));
        };

        let genres = movie
            .genre_ids
            .iter()
            .filter_map(|&id| {
                genre_name(id).map(|name| Genre {
                    id,
                    name: name.to_string(),
                })
            })
            .collect();

        Ok(MovieDetails {
            genres,
            runtime: Some(runtime),
            budget: 0,
            revenue: 0,
            status: status.to_string(),
            tagline: None,
            homepage: None,
            imdb_id: None,
            production_companies: Vec::new(),
            production_countries: Vec::new(),
            spoken_languages: Vec::new(),
            movie,
        })
    }
}
