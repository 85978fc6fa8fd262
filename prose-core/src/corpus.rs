//! # Dados Embutidos
//!
//! Léxico morfossintático, gazetteers de entidades e textos de demonstração
//! usados pelos colaboradores padrão ([`LexiconTagger`](crate::tagger::LexiconTagger)
//! e [`RuleExtracter`](crate::extracter::RuleExtracter)).
//!
//! As listas são pequenas e escritas à mão. Um modelo real carregaria esses
//! recursos de disco; aqui eles existem para que o pipeline seja executável
//! sem arquivos externos.

/// Palavras fechadas e frequentes com sua etiqueta Penn Treebank (lowercase).
pub const LEXICON: &[(&str, &str)] = &[
    // Determinantes
    ("a", "DT"), ("an", "DT"), ("the", "DT"), ("this", "DT"), ("that", "DT"),
    ("these", "DT"), ("those", "DT"), ("every", "DT"), ("each", "DT"), ("some", "DT"),
    ("any", "DT"), ("no", "DT"), ("all", "DT"), ("both", "DT"), ("another", "DT"),
    // Pronomes
    ("i", "PRP"), ("you", "PRP"), ("he", "PRP"), ("she", "PRP"), ("it", "PRP"),
    ("we", "PRP"), ("they", "PRP"), ("me", "PRP"), ("him", "PRP"), ("us", "PRP"),
    ("them", "PRP"), ("its", "PRP$"), ("my", "PRP$"), ("your", "PRP$"), ("his", "PRP$"),
    ("her", "PRP$"), ("our", "PRP$"), ("their", "PRP$"), ("who", "WP"), ("what", "WP"),
    ("which", "WDT"), ("where", "WRB"), ("when", "WRB"), ("why", "WRB"), ("how", "WRB"),
    // Preposições e conjunções
    ("in", "IN"), ("on", "IN"), ("at", "IN"), ("of", "IN"), ("for", "IN"),
    ("with", "IN"), ("by", "IN"), ("from", "IN"), ("into", "IN"), ("over", "IN"),
    ("under", "IN"), ("about", "IN"), ("after", "IN"), ("before", "IN"), ("as", "IN"),
    ("if", "IN"), ("because", "IN"), ("than", "IN"), ("through", "IN"), ("during", "IN"),
    ("to", "TO"), ("and", "CC"), ("or", "CC"), ("but", "CC"), ("nor", "CC"),
    ("there", "EX"),
    // Modais e auxiliares
    ("can", "MD"), ("could", "MD"), ("will", "MD"), ("would", "MD"), ("shall", "MD"),
    ("should", "MD"), ("may", "MD"), ("might", "MD"), ("must", "MD"),
    ("be", "VB"), ("am", "VBP"), ("is", "VBZ"), ("are", "VBP"), ("was", "VBD"),
    ("were", "VBD"), ("been", "VBN"), ("being", "VBG"), ("have", "VBP"), ("has", "VBZ"),
    ("had", "VBD"), ("having", "VBG"), ("do", "VBP"), ("does", "VBZ"), ("did", "VBD"),
    // Verbos frequentes
    ("go", "VBP"), ("went", "VBD"), ("gone", "VBN"), ("make", "VBP"), ("made", "VBD"),
    ("take", "VBP"), ("took", "VBD"), ("see", "VBP"), ("saw", "VBD"), ("run", "VBP"),
    ("ran", "VBD"), ("eat", "VBP"), ("ate", "VBD"), ("say", "VBP"), ("said", "VBD"),
    ("get", "VBP"), ("got", "VBD"), ("know", "VBP"), ("knew", "VBD"), ("come", "VBP"),
    ("came", "VBD"), ("give", "VBP"), ("gave", "VBD"), ("find", "VBP"), ("found", "VBD"),
    ("think", "VBP"), ("thought", "VBD"), ("tell", "VBP"), ("told", "VBD"), ("meet", "VBP"),
    ("met", "VBD"), ("sat", "VBD"), ("wrote", "VBD"), ("written", "VBN"),
    ("work", "VBP"), ("live", "VBP"), ("follow", "VBP"),
    // Advérbios
    ("not", "RB"), ("n't", "RB"), ("very", "RB"), ("also", "RB"), ("too", "RB"),
    ("never", "RB"), ("always", "RB"), ("often", "RB"), ("here", "RB"), ("now", "RB"),
    ("then", "RB"), ("again", "RB"), ("still", "RB"), ("just", "RB"), ("yesterday", "NN"),
    ("today", "NN"), ("tomorrow", "NN"),
    // Adjetivos
    ("little", "JJ"), ("big", "JJ"), ("small", "JJ"), ("good", "JJ"), ("bad", "JJ"),
    ("new", "JJ"), ("old", "JJ"), ("great", "JJ"), ("white", "JJ"), ("black", "JJ"),
    ("red", "JJ"), ("long", "JJ"), ("young", "JJ"), ("other", "JJ"), ("same", "JJ"),
    ("first", "JJ"), ("last", "JJ"), ("many", "JJ"), ("much", "JJ"), ("few", "JJ"),
    ("sure", "JJ"), ("best", "JJS"), ("better", "JJR"),
    // Substantivos frequentes
    ("lamb", "NN"), ("fleece", "NN"), ("snow", "NN"), ("school", "NN"), ("day", "NN"),
    ("time", "NN"), ("year", "NN"), ("man", "NN"), ("woman", "NN"), ("child", "NN"),
    ("people", "NNS"), ("children", "NNS"), ("men", "NNS"), ("women", "NNS"),
    ("world", "NN"), ("house", "NN"), ("city", "NN"), ("company", "NN"), ("dog", "NN"),
    ("cat", "NN"), ("book", "NN"), ("water", "NN"), ("way", "NN"), ("thing", "NN"),
    ("president", "NN"), ("doctor", "NN"), ("office", "NN"), ("fact", "NN"),
];

/// Nomes (primeiro nome ou sobrenome) conhecidos de pessoas.
pub const PERSONS: &[&str] = &[
    "Mary", "John", "James", "Robert", "Michael", "William", "David", "Richard",
    "Joseph", "Thomas", "Charles", "Elizabeth", "Jennifer", "Linda", "Barbara",
    "Susan", "Sarah", "Karen", "Nancy", "Margaret", "Alice", "Emma", "Olivia",
    "Sherlock", "Holmes", "Watson", "Moriarty", "Hudson", "Lestrade", "Irene",
    "Shelley", "Austen", "Dickens", "Shakespeare", "Darwin", "Einstein", "Newton",
    "Lincoln", "Washington", "Obama", "Churchill", "Lula", "Machado", "Pelé",
];

/// Locais conhecidos, inclusive multipalavra.
pub const LOCATIONS: &[&str] = &[
    "London", "Paris", "Berlin", "Rome", "Madrid", "Lisbon", "Tokyo", "Beijing",
    "New York", "Los Angeles", "San Francisco", "Washington D.C.", "Baker Street",
    "England", "France", "Germany", "Italy", "Spain", "Portugal", "Japan", "China",
    "Brazil", "Brasil", "São Paulo", "Rio de Janeiro", "United States", "United Kingdom",
    "Europe", "Asia", "Africa", "America", "Texas", "California", "Scotland",
];

/// Organizações conhecidas, inclusive multipalavra.
pub const ORGANIZATIONS: &[&str] = &[
    "Google", "Microsoft", "Apple", "Amazon", "Mozilla", "IBM", "Intel",
    "United Nations", "UNESCO", "NASA", "FIFA", "BBC", "Reuters",
    "Scotland Yard", "Oxford University", "Harvard University", "Petrobras",
    "World Health Organization", "European Union", "Red Cross",
];

/// Eventos, obras e outras entidades.
pub const MISC: &[&str] = &[
    "World Cup", "Olympic Games", "Christmas", "Easter", "Carnaval",
    "World War II", "COVID-19", "Frankenstein", "Hamlet", "Bible",
];

/// Títulos que precedem nomes de pessoas (lowercase, sem ponto).
pub const PERSON_TITLES: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sir", "lady", "lord", "president", "senator",
    "governor", "minister", "captain", "inspector", "detective", "king", "queen",
    "general", "judge", "sr", "sra",
];

/// Sufixos que indicam organização (lowercase, sem ponto).
pub const ORG_SUFFIXES: &[&str] = &[
    "inc", "corp", "corporation", "ltd", "llc", "co", "plc", "gmbh", "group",
    "holdings", "foundation", "institute", "university", "ltda",
];

/// Textos de demonstração (domínio, texto)
pub fn demo_texts() -> Vec<(&'static str, &'static str)> {
    vec![
        ("nursery", "Mary had a little lamb. Its fleece was white as snow."),
        (
            "fiction",
            "Dr. Watson met Sherlock Holmes in London. They shared rooms at Baker Street.",
        ),
        (
            "business",
            "Acme Widgets Inc. opened an office in New York after Google bought a rival.",
        ),
        (
            "history",
            "President Lincoln delivered the address in 1863. The World Cup came much later.",
        ),
    ]
}
