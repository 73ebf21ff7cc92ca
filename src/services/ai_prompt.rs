use crate::services::language::Language;
use crate::services::preferences::{ExerciseSwapRequest, NutritionPreferences, WorkoutPreferences};
use crate::services::weekdays::{WEEK, WeekSchedule, Weekday, join_keys};

pub fn rest_day_message(language: Language) -> &'static str {
    match language {
        Language::En => "Rest day",
        Language::Pt => "Dia de descanso",
    }
}

/// Human readable label for a form option such as `resistance_bands`.
pub fn option_label(value: &str, language: Language) -> String {
    let known = match (value, language) {
        ("dumbbells", Language::En) => Some("Dumbbells"),
        ("barbell", Language::En) => Some("Barbell"),
        ("kettlebells", _) => Some("Kettlebells"),
        ("resistance_bands", Language::En) => Some("Resistance Bands"),
        ("yoga_mat", Language::En) => Some("Yoga Mat"),
        ("pull_up_bar", Language::En) => Some("Pull-up Bar"),
        ("gym", Language::En) => Some("Gym Equipment"),
        ("home", Language::En) => Some("Home Workout"),
        ("none", Language::En) => Some("No equipment"),
        ("dumbbells", Language::Pt) => Some("Halteres"),
        ("barbell", Language::Pt) => Some("Barra"),
        ("resistance_bands", Language::Pt) => Some("Faixas de Resistência"),
        ("yoga_mat", Language::Pt) => Some("Tapete de Yoga"),
        ("pull_up_bar", Language::Pt) => Some("Barra Fixa"),
        ("gym", Language::Pt) => Some("Academia"),
        ("home", Language::Pt) => Some("Treino em Casa"),
        ("none", Language::Pt) => Some("Sem equipamento"),
        ("chest", Language::Pt) => Some("Peito"),
        ("back", Language::Pt) => Some("Costas"),
        ("legs", Language::Pt) => Some("Pernas"),
        ("shoulders", Language::Pt) => Some("Ombros"),
        ("arms", Language::Pt) => Some("Braços"),
        ("vegetarian", Language::Pt) => Some("Vegetariano"),
        ("vegan", Language::Pt) => Some("Vegano"),
        ("gluten_free", Language::Pt) => Some("Sem glúten"),
        ("lactose_free", Language::Pt) => Some("Sem lactose"),
        ("italian", Language::Pt) => Some("Italiana"),
        ("mexican", Language::Pt) => Some("Mexicana"),
        ("asian", Language::Pt) => Some("Asiática"),
        ("indian", Language::Pt) => Some("Indiana"),
        ("mediterranean", Language::Pt) => Some("Mediterrânea"),
        _ => None,
    };

    match known {
        Some(label) => label.to_string(),
        None => title_case(value),
    }
}

fn title_case(value: &str) -> String {
    value
        .split(['_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn label_list(values: &[String], language: Language) -> String {
    values
        .iter()
        .map(|value| option_label(value, language))
        .collect::<Vec<_>>()
        .join(", ")
}

fn free_text(value: &str) -> &str {
    value.trim_end_matches('.')
}

fn workout_preference_clauses(
    preferences: &WorkoutPreferences,
    schedule: &WeekSchedule,
) -> Vec<String> {
    let language = preferences.language;
    let mut lines = Vec::new();

    match language {
        Language::En => {
            lines.push("The workout plan should be in English. Use common exercise names and make sure all content is in English.".to_string());
            lines.push(format!(
                "This person is {} years old and {}.",
                preferences.age,
                preferences.gender.label(language)
            ));
            lines.push(format!("Fitness level: {}.", preferences.fitness_level.label(language)));
            lines.push(format!("Goal: {}.", preferences.goal.label(language)));
            lines.push(format!(
                "Workout duration: {} minutes per session.",
                preferences.duration.minutes()
            ));
            lines.push(format!("Days per week: {}.", schedule.training_days().len()));
        }
        Language::Pt => {
            lines.push("O plano de treino deve estar em português do Brasil. Use nomes populares para os exercícios e certifique-se de que todo o conteúdo esteja em português.".to_string());
            lines.push(format!(
                "Esta pessoa tem {} anos e é do sexo {}.",
                preferences.age,
                preferences.gender.label(language)
            ));
            lines.push(format!(
                "Nível de condicionamento: {}.",
                preferences.fitness_level.label(language)
            ));
            lines.push(format!("Objetivo: {}.", preferences.goal.label(language)));
            lines.push(format!(
                "Duração do treino: {} minutos por sessão.",
                preferences.duration.minutes()
            ));
            lines.push(format!("Dias por semana: {}.", schedule.training_days().len()));
        }
    }

    let (training_label, rest_label) = match language {
        Language::En => ("Workout days", "Rest days"),
        Language::Pt => ("Dias de treino", "Dias de descanso"),
    };
    lines.push(format!(
        "{training_label}: {}.",
        join_keys(schedule.training_days(), language)
    ));
    lines.push(format!("{rest_label}: {}.", join_keys(&schedule.rest_days(), language)));

    let optional = [
        (
            &preferences.available_equipment,
            ("Available equipment", "Equipamentos disponíveis"),
        ),
        (
            &preferences.specific_focus_areas,
            ("Focus areas", "Áreas de foco"),
        ),
    ];
    for (values, (en, pt)) in optional {
        if !values.is_empty() {
            let label = if language == Language::Pt { pt } else { en };
            lines.push(format!("{label}: {}.", label_list(values, language)));
        }
    }

    if !preferences.injuries.is_empty() {
        let label = match language {
            Language::En => "Injuries or limitations",
            Language::Pt => "Lesões ou limitações",
        };
        lines.push(format!("{label}: {}.", free_text(&preferences.injuries)));
    }

    if !preferences.additional_notes.is_empty() {
        let label = match language {
            Language::En => "Additional notes",
            Language::Pt => "Notas adicionais",
        };
        lines.push(format!("{label}: {}.", free_text(&preferences.additional_notes)));
    }

    lines
}

fn render_workout_example(language: Language, schedule: &WeekSchedule) -> String {
    let days = WEEK
        .iter()
        .map(|day| {
            let key = day.key(language);
            if schedule.is_training_day(*day) {
                format!(
                    "        \"{key}\": [\n            {{ \"name\": \"...\", \"description\": \"...\", \"image\": \"...\" }}\n        ]"
                )
            } else {
                format!("        \"{key}\": \"{}\"", rest_day_message(language))
            }
        })
        .collect::<Vec<_>>()
        .join(",\n");

    format!("{{\n    \"workout\": {{\n{days}\n    }}\n}}")
}

/// Prompt asking for a full week of workouts matching `preferences`.
pub fn build_workout_prompt(preferences: &WorkoutPreferences) -> String {
    let language = preferences.language;
    let schedule = preferences.schedule();
    let clauses = workout_preference_clauses(preferences, &schedule).join("\n");
    let example = render_workout_example(language, &schedule);
    let rest_message = rest_day_message(language);

    match language {
        Language::En => format!(
            r#"Generate a personalized weekly workout plan covering all 7 days of the week.

{clauses}

For each workout day, list the exercises. For each exercise, include the name, a description with sets, repetitions and rest time, and a relevant image URL with free use images.
For each rest day, use the text "{rest_message}" instead of a list of exercises.
Return ONLY a valid JSON object, without Markdown code fences, using these exact weekday keys and the following structure:
{example}

Make sure the plan is balanced across the whole week: spread the workload evenly over the workout days, avoid training the same muscle group on consecutive days and keep every rest day free of exercises."#
        ),
        Language::Pt => format!(
            r#"Gere um plano de treino semanal personalizado cobrindo os 7 dias da semana.

{clauses}

Para cada dia de treino, liste os exercícios. Para cada exercício, inclua o nome, uma descrição com séries, repetições e tempo de descanso, e uma URL de imagem relevante de uso livre.
Para cada dia de descanso, use o texto "{rest_message}" no lugar da lista de exercícios.
Retorne SOMENTE um objeto JSON válido, sem blocos de código Markdown, usando exatamente estas chaves de dias da semana e a seguinte estrutura:
{example}

Certifique-se de que o plano seja equilibrado ao longo de toda a semana: distribua a carga de forma uniforme entre os dias de treino, evite treinar o mesmo grupo muscular em dias consecutivos e mantenha os dias de descanso sem exercícios."#
        ),
    }
}

fn nutrition_preference_clauses(preferences: &NutritionPreferences) -> Vec<String> {
    let language = preferences.language;
    let mut lines = Vec::new();

    let (restrictions, allergies, cuisines, notes) = match language {
        Language::En => {
            lines.push("The meal plan should be in English. Use common names for foods and meals. Make sure all content is in English.".to_string());
            lines.push(format!(
                "This person is {} years old and {}.",
                preferences.age,
                preferences.gender.label(language)
            ));
            lines.push(format!("Goal: {}.", preferences.diet_goal.label(language)));
            lines.push(format!("Daily calorie goal: {} kcal.", preferences.calories_per_day));
            lines.push(format!("Weekly budget: {} USD.", preferences.budget_per_week));
            (
                "Dietary restrictions",
                "Allergies",
                "Preferred cuisines",
                "Additional notes",
            )
        }
        Language::Pt => {
            lines.push("O plano alimentar deve estar em português do Brasil. Use nomes populares para os alimentos e refeições. Certifique-se de que todo o conteúdo esteja em português.".to_string());
            lines.push(format!(
                "Esta pessoa tem {} anos e é do sexo {}.",
                preferences.age,
                preferences.gender.label(language)
            ));
            lines.push(format!("Objetivo: {}.", preferences.diet_goal.label(language)));
            lines.push(format!(
                "Meta de calorias diárias: {} kcal.",
                preferences.calories_per_day
            ));
            lines.push(format!("Orçamento semanal: {} BRL.", preferences.budget_per_week));
            (
                "Restrições alimentares",
                "Alergias",
                "Cozinhas preferidas",
                "Notas adicionais",
            )
        }
    };

    for (values, label) in [
        (&preferences.dietary_restrictions, restrictions),
        (&preferences.allergies, allergies),
        (&preferences.preferred_cuisines, cuisines),
    ] {
        if !values.is_empty() {
            lines.push(format!("{label}: {}.", label_list(values, language)));
        }
    }

    if !preferences.additional_notes.is_empty() {
        lines.push(format!("{notes}: {}.", free_text(&preferences.additional_notes)));
    }

    lines
}

fn render_meal_example(language: Language) -> String {
    let first = Weekday::Monday.key(language);
    let second = Weekday::Tuesday.key(language);

    let (name, ingredients, instructions) = match language {
        Language::En => (
            "Spinach Omelet",
            r#""2 eggs", "1 cup fresh spinach", "1 teaspoon olive oil", "Salt and pepper to taste""#,
            r"1. Heat olive oil in a non-stick pan.\n2. Add spinach and sauté until wilted.\n3. Whisk eggs with salt and pepper.\n4. Pour eggs over spinach and cook over medium heat until set.\n5. Fold the omelet in half and serve hot.",
        ),
        Language::Pt => (
            "Omelete de Espinafre",
            r#""2 ovos", "1 xícara de espinafre fresco", "1 colher de chá de azeite", "Sal e pimenta a gosto""#,
            r"1. Aqueça o azeite em uma frigideira antiaderente.\n2. Adicione o espinafre e refogue até murchar.\n3. Bata os ovos com sal e pimenta.\n4. Despeje os ovos sobre o espinafre e cozinhe em fogo médio até firmar.\n5. Dobre a omelete ao meio e sirva quente.",
        ),
    };

    format!(
        r#"{{
    "{first}": {{
        "breakfast": {{
            "name": "{name}",
            "ingredients": [{ingredients}],
            "instructions": "{instructions}",
            "nutrition": {{ "calories": 280, "protein": 18, "carbs": 4, "fat": 22 }}
        }},
        "lunch": {{ "name": "...", "ingredients": ["..."], "instructions": "...", "nutrition": {{ "calories": 0, "protein": 0, "carbs": 0, "fat": 0 }} }},
        "dinner": {{ "name": "...", "ingredients": ["..."], "instructions": "...", "nutrition": {{ "calories": 0, "protein": 0, "carbs": 0, "fat": 0 }} }},
        "snacks": [
            {{ "name": "...", "ingredients": ["..."], "instructions": "...", "nutrition": {{ "calories": 0, "protein": 0, "carbs": 0, "fat": 0 }} }}
        ]
    }},
    "{second}": {{ "breakfast": {{ "...": "..." }}, "lunch": {{ "...": "..." }}, "dinner": {{ "...": "..." }}, "snacks": [] }}
}}"#
    )
}

/// Prompt asking for seven days of meals matching `preferences`.
pub fn build_nutrition_prompt(preferences: &NutritionPreferences) -> String {
    let language = preferences.language;
    let clauses = nutrition_preference_clauses(preferences).join("\n");
    let example = render_meal_example(language);
    let week = join_keys(&WEEK, language);
    let meals = preferences.meals_per_day;

    match language {
        Language::En => format!(
            r#"Generate a meal plan for 7 days with {meals} meals per day.

{clauses}

The plan should include breakfast, lunch, dinner, and snacks as needed.

The response should be a valid JSON object where each key is a weekday ({week}) and the value is an object with the day's meals.
For each day, include the following meals: breakfast, lunch, dinner, and snacks.
For each meal, include the name, list of ingredients, and preparation instructions.
Include total calories and macronutrients (protein, carbs, fat in grams) for each meal.
Return ONLY the JSON object, without Markdown code fences.

Example format:
{example}

Make sure the meal plan is balanced, varied, and meets daily nutritional needs on every one of the 7 days. Include a variety of fruits, vegetables, lean proteins, whole grains, and healthy fats."#
        ),
        Language::Pt => format!(
            r#"Gere um plano alimentar para 7 dias com {meals} refeições por dia.

{clauses}

O plano deve incluir café da manhã, almoço, jantar e lanches conforme necessário.

A resposta deve ser um objeto JSON válido onde cada chave é um dia da semana ({week}) e o valor é um objeto com as refeições do dia.
Para cada dia, inclua as seguintes refeições: breakfast (café da manhã), lunch (almoço), dinner (jantar) e snacks (lanches).
Para cada refeição, inclua o nome, lista de ingredientes e instruções de preparo.
Inclua o total de calorias e macronutrientes (proteínas, carboidratos e gorduras em gramas) para cada refeição.
Retorne SOMENTE o objeto JSON, sem blocos de código Markdown.

Exemplo de formato:
{example}

Certifique-se de que o plano alimentar seja equilibrado, variado e atenda às necessidades nutricionais diárias em todos os 7 dias. Inclua uma variedade de frutas, vegetais, proteínas magras, grãos integrais e gorduras saudáveis."#
        ),
    }
}

/// Prompt asking for one alternative to an exercise the user wants replaced.
pub fn build_exercise_swap_prompt(request: &ExerciseSwapRequest) -> String {
    let name = &request.name_workout;
    let description = free_text(&request.description_workout);

    match request.language {
        Language::En => format!(
            r#"Suggest one alternative exercise to replace "{name}" in the same workout plan.
Current exercise description: {description}.
The replacement should train the same muscle groups at a similar difficulty. The name and description must be in English; the description should include sets, repetitions and rest time.
Return ONLY a valid JSON object, without Markdown code fences, with the following structure:
{{ "name": "...", "description": "...", "image": "..." }}"#
        ),
        Language::Pt => format!(
            r#"Sugira um exercício alternativo para substituir "{name}" no mesmo plano de treino.
Descrição do exercício atual: {description}.
O substituto deve trabalhar os mesmos grupos musculares com dificuldade semelhante. O nome e a descrição devem estar em português; a descrição deve incluir séries, repetições e tempo de descanso.
Retorne SOMENTE um objeto JSON válido, sem blocos de código Markdown, com a seguinte estrutura:
{{ "name": "...", "description": "...", "image": "..." }}"#
        ),
    }
}
